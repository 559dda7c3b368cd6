//! Serde mirrors of the two static water-property data files.

use serde::Deserialize;

/// A piecewise-polynomial segment, coefficients highest-degree-first.
#[derive(Debug, Clone, Deserialize)]
pub struct PolynomialFit {
    pub x_min: f64,
    pub x_max: f64,
    pub degree: usize,
    pub coeffs: Vec<f64>,
}

impl PolynomialFit {
    /// Horner evaluation. Does not clamp to [x_min, x_max]; callers decide
    /// whether extrapolation is acceptable.
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }
}

/// A set of polynomial segments covering (possibly overlapping) subranges
/// of the same function; `eval` picks the first segment whose domain
/// contains `x`, falling back to the nearest endpoint segment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PolynomialFitSet(pub Vec<PolynomialFit>);

impl PolynomialFitSet {
    pub fn eval(&self, x: f64) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        if let Some(seg) = self.0.iter().find(|s| s.contains(x)) {
            return Some(seg.eval(x));
        }
        // extrapolate from whichever endpoint segment is closer
        let below = self
            .0
            .iter()
            .min_by(|a, b| (a.x_min - x).abs().partial_cmp(&(b.x_min - x).abs()).unwrap());
        below.map(|s| s.eval(x))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CriticalPoint {
    #[serde(rename = "T_K")]
    pub t_k: f64,
    #[serde(rename = "T_C")]
    pub t_c: f64,
    #[serde(rename = "P_MPa")]
    pub p_mpa: f64,
    pub u_c: f64,
    pub v_c: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UGMax {
    #[serde(rename = "T_K")]
    pub t_k: f64,
    pub u_g: f64,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Polynomials {
    #[serde(rename = "P_sat_from_T", default)]
    pub p_sat_from_t: PolynomialFitSet,
    #[serde(rename = "u_f_from_T", default)]
    pub u_f_from_t: PolynomialFitSet,
    #[serde(rename = "v_f_from_T", default)]
    pub v_f_from_t: PolynomialFitSet,
    #[serde(rename = "u_g_from_T", default)]
    pub u_g_from_t: PolynomialFitSet,
    #[serde(rename = "v_g_from_T", default)]
    pub v_g_from_t: PolynomialFitSet,
    #[serde(rename = "T_from_u_f", default)]
    pub t_from_u_f: PolynomialFitSet,
    #[serde(rename = "T_from_u_g_ascending", default)]
    pub t_from_u_g_ascending: PolynomialFitSet,
    #[serde(rename = "T_from_u_g_descending", default)]
    pub t_from_u_g_descending: PolynomialFitSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSatRow {
    #[serde(rename = "T_K")]
    pub t_k: f64,
    #[serde(rename = "T_C")]
    pub t_c: f64,
    #[serde(rename = "P_MPa")]
    pub p_mpa: f64,
    pub u_f: f64,
    pub v_f: f64,
    pub u_g: f64,
    pub v_g: f64,
    #[serde(default)]
    pub h_f: Option<f64>,
    #[serde(default)]
    pub h_g: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaturationDomeData {
    pub critical_point: CriticalPoint,
    pub u_g_max: UGMax,
    #[serde(default)]
    pub polynomials: Polynomials,
    pub raw_data: Vec<RawSatRow>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    CompressedLiquid,
    Vapor,
    Supercritical,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridPoint {
    pub u: f64,
    pub v: f64,
    #[serde(rename = "T_K")]
    pub t_k: f64,
    #[serde(rename = "T_C")]
    pub t_c: f64,
    #[serde(rename = "P_MPa")]
    pub p_mpa: f64,
    pub region: Region,
    #[serde(default)]
    pub curve: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UvGridData {
    pub n_points: usize,
    pub points: Vec<GridPoint>,
}
