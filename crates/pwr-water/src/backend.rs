//! The water-property backend: a process-wide, read-only service answering
//! thermodynamic closure queries from static IAPWS-derived tables.

use std::sync::OnceLock;

use tracing::{debug, warn};

use pwr_core::numeric::ensure_finite;
use pwr_core::units::constants::{R_UNIVERSAL, RHO_CRIT};

use crate::data::{Region, SaturationDomeData, UvGridData};
use crate::dome::SaturationDome;
use crate::error::{WaterError, WaterResult};
use crate::grid::UvGrid;
use crate::state::{Phase, ThermoResult};

const SATURATION_DOME_JSON: &str = include_str!("../data/saturation_dome.json");
const UV_GRID_JSON: &str = include_str!("../data/uv_grid.json");

/// u below which the liquid line's density anomaly (v_f has a local
/// minimum rather than increasing monotonically with T) is in play.
const NEAR_TRIPLE_U_J_PER_KG: f64 = 50_000.0;
/// Liquid/vapor split used when a point is not inside the dome (spec §4.1
/// step 4): dense or cool enough to be liquid.
const LIQUID_U_THRESHOLD_J_PER_KG: f64 = 1.8e6;
const LIQUID_RHO_FRACTION: f64 = 0.5;

const P_MIN_PA: f64 = 1.0e3;
const T_MAX_K: f64 = 3000.0;

const LIQUID_V_TOLERANCE: f64 = 1.0e-5; // m^3/kg slack on the saturation-anchored liquid check

/// Low-order compressibility-factor table for the dilute ideal-gas
/// fallback, keyed by rho/rho_crit.
const Z_TABLE: [(f64, f64); 5] = [
    (0.0, 1.00),
    (0.2, 0.97),
    (0.5, 0.90),
    (1.0, 0.55),
    (2.0, 1.30),
];

fn compressibility_factor(rho_ratio: f64) -> f64 {
    if rho_ratio <= Z_TABLE[0].0 {
        return Z_TABLE[0].1;
    }
    for w in Z_TABLE.windows(2) {
        let (x0, y0) = w[0];
        let (x1, y1) = w[1];
        if rho_ratio <= x1 {
            return pwr_core::lerp(rho_ratio, x0, y0, x1, y1);
        }
    }
    Z_TABLE[Z_TABLE.len() - 1].1
}

pub struct WaterBackend {
    dome: SaturationDome,
    grid: UvGrid,
}

static BACKEND: OnceLock<WaterBackend> = OnceLock::new();

impl WaterBackend {
    /// Parse the bundled static data files. Exposed for tests; production
    /// callers use [`WaterBackend::global`].
    pub fn from_bundled_data() -> WaterResult<Self> {
        let dome_data: SaturationDomeData =
            serde_json::from_str(SATURATION_DOME_JSON).map_err(|e| WaterError::DataLoad {
                message: format!("saturation_dome.json: {e}"),
            })?;
        let grid_data: UvGridData =
            serde_json::from_str(UV_GRID_JSON).map_err(|e| WaterError::DataLoad {
                message: format!("uv_grid.json: {e}"),
            })?;
        let dome = SaturationDome::from_data(dome_data)?;
        let grid = UvGrid::from_data(grid_data);
        Ok(Self { dome, grid })
    }

    /// The process-wide backend instance. Loading happens once, lazily, on
    /// first call; every caller afterwards shares the same read-only
    /// tables (spec §4.1: "pure and thread-safe after data loading;
    /// loading is idempotent").
    pub fn global() -> &'static WaterBackend {
        BACKEND.get_or_init(|| {
            Self::from_bundled_data().expect("bundled water-property data must parse")
        })
    }

    pub fn t_triple_k(&self) -> f64 {
        self.dome.t_triple_k()
    }

    pub fn t_crit_k(&self) -> f64 {
        self.dome.t_crit_k()
    }

    pub fn p_crit_pa(&self) -> f64 {
        self.dome.p_crit_pa()
    }

    pub fn saturation_pressure(&self, t_k: f64) -> f64 {
        self.dome.p_sat_pa(t_k)
    }

    /// T such that saturation_pressure(T) = p, found by bisection over the
    /// dome's P_sat(T) curve (monotonic increasing).
    pub fn saturation_temperature(&self, p_pa: f64) -> f64 {
        let mut lo = self.dome.t_triple_k();
        let mut hi = self.dome.t_crit_k();
        let mut p_lo = self.dome.p_sat_pa(lo);
        if p_pa <= p_lo {
            return lo;
        }
        let p_hi = self.dome.p_sat_pa(hi);
        if p_pa >= p_hi {
            return hi;
        }
        for _ in 0..60 {
            let mid = 0.5 * (lo + hi);
            let p_mid = self.dome.p_sat_pa(mid);
            if p_mid < p_pa {
                lo = mid;
                p_lo = p_mid;
            } else {
                hi = mid;
            }
            if (hi - lo).abs() < 1e-6 {
                break;
            }
        }
        let _ = p_lo;
        0.5 * (lo + hi)
    }

    pub fn bulk_modulus_pa(&self, t_celsius: f64, k_max: Option<f64>) -> f64 {
        crate::bulk_modulus::bulk_modulus_pa(t_celsius, k_max)
    }

    /// Saturated-liquid specific enthalpy h_f = u_f + P_sat*v_f at `t_k`.
    /// Used by the fluid-flow rate operator to value mass drawn from a
    /// two-phase node's liquid fraction (spec §4.3 "phase-specific
    /// saturated specific enthalpy").
    pub fn saturated_liquid_enthalpy_j_per_kg(&self, t_k: f64) -> f64 {
        self.dome.u_f_from_t(t_k) + self.dome.p_sat_pa(t_k) * self.dome.v_f_from_t(t_k)
    }

    /// Saturated-vapor specific enthalpy h_g = u_g + P_sat*v_g at `t_k`.
    pub fn saturated_vapor_enthalpy_j_per_kg(&self, t_k: f64) -> f64 {
        self.dome.u_g_from_t(t_k) + self.dome.p_sat_pa(t_k) * self.dome.v_g_from_t(t_k)
    }

    /// Latent heat of vaporization h_fg = h_g - h_f at `t_k`.
    pub fn latent_heat_j_per_kg(&self, t_k: f64) -> f64 {
        self.saturated_vapor_enthalpy_j_per_kg(t_k) - self.saturated_liquid_enthalpy_j_per_kg(t_k)
    }

    pub fn saturated_liquid_specific_volume_m3_per_kg(&self, t_k: f64) -> f64 {
        self.dome.v_f_from_t(t_k)
    }

    pub fn saturated_vapor_specific_volume_m3_per_kg(&self, t_k: f64) -> f64 {
        self.dome.v_g_from_t(t_k)
    }

    /// Signed distance in mL/kg between `v` and the saturated-liquid
    /// specific volume at the temperature whose liquid-line energy matches
    /// `u`. Used by the constraint layer to blend bulk-modulus stiffness
    /// near the two-phase/liquid boundary (spec §9 "two-phase-to-liquid
    /// transition discontinuity").
    pub fn distance_from_saturation_ml_per_kg(&self, u: f64, v: f64) -> f64 {
        let t_sat = self.dome.t_from_u_f(u);
        let v_f = self.dome.v_f_from_t(t_sat);
        (v - v_f) * 1.0e6
    }

    fn is_inside_two_phase_dome(&self, u: f64, v: f64) -> bool {
        let v_c = self.dome.v_crit();
        if v <= v_c {
            if u < NEAR_TRIPLE_U_J_PER_KG {
                // Density-anomaly band: compare v against v_f(u) instead of
                // interpolating the liquid line by v.
                let v_f_at_u = self.dome.v_f_from_u_f(u);
                v <= v_f_at_u
            } else {
                let u_f_at_v = self.dome.u_f_from_v_f(v);
                u <= u_f_at_v
            }
        } else {
            let t_crit = self.dome.t_crit_k();
            let u_crit = self.dome.u_crit();
            let v_crit = self.dome.v_crit();
            let rows = self.dome.raw_rows();
            let last = rows.last().expect("raw_data is non-empty");
            if v >= last.v_g || last.v_g <= v_crit {
                // Extrapolate linearly in log(v) from the last tabulated
                // vapor row to the critical point.
                let log_v_last = last.v_g.max(1e-12).ln();
                let log_v_crit = v_crit.max(1e-12).ln();
                let log_v = v.max(1e-12).ln();
                if (log_v_crit - log_v_last).abs() < 1e-12 {
                    return u <= u_crit;
                }
                let frac = (log_v - log_v_last) / (log_v_crit - log_v_last);
                let u_boundary = pwr_core::lerp(frac, 0.0, last.u_g * 1.0e3, 1.0, u_crit);
                let _ = t_crit;
                u <= u_boundary
            } else {
                let u_g_at_v = self.dome.u_g_from_v_g(v);
                u <= u_g_at_v
            }
        }
    }

    /// Binary search T in (T_triple, T_crit) for the unique T where
    /// quality-by-volume equals quality-by-energy.
    fn solve_two_phase(&self, u: f64, v: f64) -> WaterResult<ThermoResult> {
        let mut lo = self.dome.t_triple_k();
        let mut hi = self.dome.t_crit_k() - 1e-6;

        let residual = |t: f64| -> f64 {
            let v_f = self.dome.v_f_from_t(t);
            let v_g = self.dome.v_g_from_t(t);
            let u_f = self.dome.u_f_from_t(t);
            let u_g = self.dome.u_g_from_t(t);
            let x_by_v = (v - v_f) / (v_g - v_f);
            let x_by_u = (u - u_f) / (u_g - u_f);
            x_by_v - x_by_u
        };

        let mut f_lo = residual(lo);
        let f_hi = residual(hi);
        if f_lo.signum() == f_hi.signum() {
            // Pathological inputs right at the dome boundary; fall back to
            // whichever endpoint has the smaller residual magnitude.
            warn!(u, v, "two-phase residual does not bracket a root; using boundary estimate");
            let t = if f_lo.abs() < f_hi.abs() { lo } else { hi };
            let u_f = self.dome.u_f_from_t(t);
            let u_g = self.dome.u_g_from_t(t);
            let x = ((u - u_f) / (u_g - u_f)).clamp(0.0, 1.0);
            return Ok(ThermoResult::two_phase(t, self.dome.p_sat_pa(t), x));
        }

        let mut t_mid = 0.5 * (lo + hi);
        for _ in 0..80 {
            t_mid = 0.5 * (lo + hi);
            let f_mid = residual(t_mid);
            if f_mid.abs() < 1e-9 || (hi - lo) < 1e-6 {
                break;
            }
            if f_mid.signum() == f_lo.signum() {
                lo = t_mid;
                f_lo = f_mid;
            } else {
                hi = t_mid;
            }
        }

        let u_f = self.dome.u_f_from_t(t_mid);
        let u_g = self.dome.u_g_from_t(t_mid);
        let x = if (u_g - u_f).abs() > 1e-9 {
            ((u - u_f) / (u_g - u_f)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        Ok(ThermoResult::two_phase(t_mid, self.dome.p_sat_pa(t_mid), x))
    }

    fn solve_liquid(&self, u: f64, v: f64) -> WaterResult<ThermoResult> {
        let t_sat = self.dome.t_from_u_f(u);
        let v_f = self.dome.v_f_from_t(t_sat);
        if v > v_f + LIQUID_V_TOLERANCE {
            return Err(WaterError::NonPhysical {
                what: "liquid specific volume exceeds saturated-liquid volume at T_sat",
                value: v,
            });
        }
        let k = self.bulk_modulus_pa(t_sat - 273.15, None);
        let p = self.dome.p_sat_pa(t_sat) + k * (v - v_f).abs() / v_f.max(1e-12);
        Ok(ThermoResult::single_phase(t_sat, p, Phase::Liquid))
    }

    fn solve_vapor_or_supercritical(&self, u: f64, v: f64) -> WaterResult<ThermoResult> {
        if let Some((t, p)) = self.grid.interpolate(u, v, Region::Vapor) {
            return Ok(ThermoResult::single_phase(t, p, Phase::Vapor));
        }
        if let Some((t, p)) = self.grid.interpolate(u, v, Region::Supercritical) {
            return Ok(ThermoResult::single_phase(t, p, Phase::Supercritical));
        }

        let rho = 1.0 / v;
        let dilute = rho < 0.1 * RHO_CRIT && u > self.dome.u_g_from_t(self.dome.t_triple_k());
        if !dilute {
            return Err(WaterError::OutOfRange {
                what: "(u,v) point falls outside the tabulated vapor/supercritical grid",
                value: v,
            });
        }

        debug!(u, v, "vapor grid miss; using ideal-gas fallback");
        // Ideal-gas estimate with a tabulated compressibility correction:
        // solve T from u assuming constant-volume specific heat for steam,
        // then P = Z*rho*R*T (R here is the specific gas constant for water).
        const R_SPECIFIC: f64 = R_UNIVERSAL / 0.0180153; // J/(kg*K)
        const CV_STEAM: f64 = 1.4e3; // J/(kg*K), crude constant for dilute superheated steam
        let t = u / CV_STEAM;
        let z = compressibility_factor(rho / RHO_CRIT);
        let p = z * rho * R_SPECIFIC * t;
        Ok(ThermoResult::single_phase(t, p, Phase::Vapor))
    }

    /// The backend's primary operation: close (mass, internal energy,
    /// volume) into (T, P, phase, quality).
    pub fn calculate_state(&self, mass: f64, u_total: f64, volume: f64) -> WaterResult<ThermoResult> {
        let mass = ensure_finite(mass, "mass").map_err(core_to_water("mass", mass))?;
        let u_total = ensure_finite(u_total, "internal energy").map_err(core_to_water("internal energy", u_total))?;
        let volume = ensure_finite(volume, "volume").map_err(core_to_water("volume", volume))?;
        if mass <= 0.0 || volume <= 0.0 {
            return Err(WaterError::NonPhysical {
                what: "mass and volume must be positive",
                value: mass.min(volume),
            });
        }
        if u_total < 0.0 {
            return Err(WaterError::NonPhysical {
                what: "internal energy must be non-negative",
                value: u_total,
            });
        }

        let v = volume / mass;
        let u = u_total / mass;
        let rho = mass / volume;

        let result = if self.is_inside_two_phase_dome(u, v) {
            self.solve_two_phase(u, v)?
        } else if rho > LIQUID_RHO_FRACTION * RHO_CRIT || u < LIQUID_U_THRESHOLD_J_PER_KG {
            self.solve_liquid(u, v)?
        } else {
            self.solve_vapor_or_supercritical(u, v)?
        };

        if result.pressure_pa < P_MIN_PA || result.pressure_pa > 10.0 * self.dome.p_crit_pa() {
            return Err(WaterError::OutOfRange {
                what: "closure pressure outside plausible range",
                value: result.pressure_pa,
            });
        }
        if result.temperature_k < self.dome.t_triple_k() || result.temperature_k > T_MAX_K {
            return Err(WaterError::OutOfRange {
                what: "closure temperature outside plausible range",
                value: result.temperature_k,
            });
        }

        Ok(result)
    }
}

fn core_to_water(what: &'static str, value: f64) -> impl FnOnce(pwr_core::CoreError) -> WaterError {
    move |_| WaterError::NonPhysical { what, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liquid_at_room_conditions_closes_to_plausible_state() {
        let backend = WaterBackend::global();
        // ~300 K liquid water: v ~ 0.001003 m^3/kg, u ~ 112.5 kJ/kg.
        let mass = 1.0;
        let volume = 0.001003;
        let u_total = 112_500.0;
        let r = backend.calculate_state(mass, u_total, volume).unwrap();
        assert_eq!(r.phase, Phase::Liquid);
        assert!(r.temperature_k > 290.0 && r.temperature_k < 310.0);
        assert!(r.pressure_pa > 0.0);
    }

    #[test]
    fn two_phase_quality_in_bounds() {
        let backend = WaterBackend::global();
        // Mix of liquid and vapor at roughly atmospheric pressure.
        let t_ref = 373.15;
        let v_f = backend.dome.v_f_from_t(t_ref);
        let v_g = backend.dome.v_g_from_t(t_ref);
        let u_f = backend.dome.u_f_from_t(t_ref);
        let u_g = backend.dome.u_g_from_t(t_ref);
        let x = 0.3;
        let v = v_f + x * (v_g - v_f);
        let u = u_f + x * (u_g - u_f);
        let mass = 1.0;
        let r = backend.calculate_state(mass, u, v).unwrap();
        assert_eq!(r.phase, Phase::TwoPhase);
        assert!(r.quality > 0.0 && r.quality < 1.0);
        assert!((r.quality - x).abs() < 0.05);
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let backend = WaterBackend::global();
        assert!(backend.calculate_state(f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn rejects_non_positive_mass() {
        let backend = WaterBackend::global();
        assert!(backend.calculate_state(0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn saturation_round_trip_within_tolerance() {
        let backend = WaterBackend::global();
        let mut t = backend.t_triple_k() + 5.0;
        while t < backend.t_crit_k() - 5.0 {
            let p = backend.saturation_pressure(t);
            let t_back = backend.saturation_temperature(p);
            assert!((t_back - t).abs() < 0.5, "T={t} T_back={t_back}");
            t += 20.0;
        }
    }
}
