//! The saturation dome: per-temperature saturated-liquid/vapor properties
//! and the inversions the backend's closure needs.

use crate::data::SaturationDomeData;
use crate::error::{WaterError, WaterResult};
use pwr_core::lerp;

pub struct SaturationDome {
    data: SaturationDomeData,
    t_k: Vec<f64>,
    p_pa: Vec<f64>,
    u_f: Vec<f64>,
    v_f: Vec<f64>,
    u_g: Vec<f64>,
    v_g: Vec<f64>,
    /// Index of the row with the maximum u_g (u_g is not monotonic in T).
    u_g_max_idx: usize,
}

/// Find the bracketing pair `(i, i+1)` in a monotonically increasing slice,
/// clamped to the table's bounds.
fn bracket_ascending(xs: &[f64], x: f64) -> (usize, usize) {
    if x <= xs[0] {
        return (0, 1.min(xs.len() - 1));
    }
    if x >= xs[xs.len() - 1] {
        return (xs.len() - 2, xs.len() - 1);
    }
    match xs.binary_search_by(|v| v.partial_cmp(&x).unwrap()) {
        Ok(i) => (i, (i + 1).min(xs.len() - 1)),
        Err(i) => (i - 1, i),
    }
}

fn bracket_descending(xs: &[f64], x: f64) -> (usize, usize) {
    // Reverse the comparison: xs is sorted descending.
    if x >= xs[0] {
        return (0, 1.min(xs.len() - 1));
    }
    if x <= xs[xs.len() - 1] {
        return (xs.len() - 2, xs.len() - 1);
    }
    let mut lo = 0usize;
    let mut hi = xs.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if xs[mid] >= x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo, hi)
}

impl SaturationDome {
    pub fn from_data(data: SaturationDomeData) -> WaterResult<Self> {
        if data.raw_data.len() < 2 {
            return Err(WaterError::DataLoad {
                message: "saturation dome raw_data must have at least 2 rows".into(),
            });
        }
        let t_k: Vec<f64> = data.raw_data.iter().map(|r| r.t_k).collect();
        let p_pa: Vec<f64> = data.raw_data.iter().map(|r| r.p_mpa * 1.0e6).collect();
        let u_f: Vec<f64> = data.raw_data.iter().map(|r| r.u_f * 1.0e3).collect();
        let v_f: Vec<f64> = data.raw_data.iter().map(|r| r.v_f).collect();
        let u_g: Vec<f64> = data.raw_data.iter().map(|r| r.u_g * 1.0e3).collect();
        let v_g: Vec<f64> = data.raw_data.iter().map(|r| r.v_g).collect();

        let u_g_max_idx = u_g
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap_or(0);

        Ok(Self {
            data,
            t_k,
            p_pa,
            u_f,
            v_f,
            u_g,
            v_g,
            u_g_max_idx,
        })
    }

    pub fn t_triple_k(&self) -> f64 {
        self.t_k[0]
    }

    pub fn t_crit_k(&self) -> f64 {
        self.data.critical_point.t_k
    }

    pub fn p_crit_pa(&self) -> f64 {
        self.data.critical_point.p_mpa * 1.0e6
    }

    /// Critical specific volume and energy, in SI (m^3/kg, J/kg).
    pub fn v_crit(&self) -> f64 {
        self.data.critical_point.v_c
    }

    pub fn u_crit(&self) -> f64 {
        self.data.critical_point.u_c * 1.0e3
    }

    fn interp_ascending(xs: &[f64], ys: &[f64], x: f64) -> f64 {
        let (i0, i1) = bracket_ascending(xs, x);
        lerp(x, xs[i0], ys[i0], xs[i1], ys[i1])
    }

    pub fn p_sat_pa(&self, t_k: f64) -> f64 {
        Self::interp_ascending(&self.t_k, &self.p_pa, t_k)
    }

    pub fn u_f_from_t(&self, t_k: f64) -> f64 {
        Self::interp_ascending(&self.t_k, &self.u_f, t_k)
    }

    pub fn v_f_from_t(&self, t_k: f64) -> f64 {
        Self::interp_ascending(&self.t_k, &self.v_f, t_k)
    }

    pub fn u_g_from_t(&self, t_k: f64) -> f64 {
        Self::interp_ascending(&self.t_k, &self.u_g, t_k)
    }

    pub fn v_g_from_t(&self, t_k: f64) -> f64 {
        Self::interp_ascending(&self.t_k, &self.v_g, t_k)
    }

    /// Invert the saturated-liquid energy line: T such that u_f(T) = u.
    /// `u_f` is monotonically increasing over the whole table (no anomaly),
    /// so a single ascending bracket suffices.
    pub fn t_from_u_f(&self, u: f64) -> f64 {
        Self::interp_ascending(&self.u_f, &self.t_k, u)
    }

    /// Invert the saturated-vapor energy line on its ascending branch
    /// (T below the u_g maximum).
    pub fn t_from_u_g_ascending(&self, u: f64) -> f64 {
        let xs = &self.u_g[..=self.u_g_max_idx];
        let ys = &self.t_k[..=self.u_g_max_idx];
        Self::interp_ascending(xs, ys, u)
    }

    /// Invert the saturated-vapor energy line on its descending branch
    /// (T above the u_g maximum, approaching the critical point).
    pub fn t_from_u_g_descending(&self, u: f64) -> f64 {
        let xs = &self.u_g[self.u_g_max_idx..];
        let ys = &self.t_k[self.u_g_max_idx..];
        // xs is descending here; reuse the descending bracket + lerp.
        let (i0, i1) = bracket_descending(xs, u);
        lerp(u, xs[i0], ys[i0], xs[i1], ys[i1])
    }

    /// Saturated-liquid specific volume as a function of saturated-liquid
    /// specific energy, by composing T_from_u_f and v_f_from_t. Valid only
    /// outside the near-triple density-anomaly band; callers handle that
    /// band separately per spec (compare v against v_f(u) directly there).
    pub fn v_f_from_u_f(&self, u: f64) -> f64 {
        self.v_f_from_t(self.t_from_u_f(u))
    }

    /// Saturated-liquid line inverted by specific volume: T such that
    /// v_f(T) = v, restricted to the monotonic branch above the density
    /// anomaly (T >= the second table row).
    pub fn t_from_v_f(&self, v: f64) -> f64 {
        let xs = &self.v_f[1..];
        let ys = &self.t_k[1..];
        Self::interp_ascending(xs, ys, v)
    }

    pub fn u_f_from_v_f(&self, v: f64) -> f64 {
        self.u_f_from_t(self.t_from_v_f(v))
    }

    /// Saturated-vapor line inverted by specific volume. `v_g` is strictly
    /// decreasing in T across the whole table.
    pub fn t_from_v_g(&self, v: f64) -> f64 {
        let (i0, i1) = bracket_descending(&self.v_g, v);
        lerp(v, self.v_g[i0], self.t_k[i0], self.v_g[i1], self.t_k[i1])
    }

    pub fn u_g_from_v_g(&self, v: f64) -> f64 {
        self.u_g_from_t(self.t_from_v_g(v))
    }

    /// Raw table access for the near-triple density-anomaly band and other
    /// special-cased lookups.
    pub fn raw_rows(&self) -> &[crate::data::RawSatRow] {
        &self.data.raw_data
    }
}
