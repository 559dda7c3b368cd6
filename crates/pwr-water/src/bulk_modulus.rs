//! Saturated-liquid bulk modulus K(T_celsius): a 37-point table at 10 degC
//! spacing (0 to 360 degC) plus a tanh-smoothed numerical cap.

/// K in Pa at T_celsius = 0, 10, 20, ..., 360.
const K_TABLE_PA: [f64; 37] = [
    2_000_000_000.0, 2_039_600_000.0, 2_078_400_000.0, 2_116_400_000.0, 2_153_600_000.0,
    2_190_000_000.0, 2_225_600_000.0, 2_260_400_000.0, 2_294_400_000.0, 2_327_600_000.0,
    2_360_000_000.0, 2_391_600_000.0, 2_422_400_000.0, 2_452_400_000.0, 2_481_600_000.0,
    2_510_000_000.0, 2_537_600_000.0, 2_564_400_000.0, 2_590_400_000.0, 2_615_600_000.0,
    2_640_000_000.0, 2_401_460_000.0, 2_171_492_000.0, 1_950_317_000.0, 1_738_172_000.0,
    1_535_323_000.0, 1_342_063_000.0, 1_158_720_000.0, 985_666_000.0, 823_326_000.0,
    672_196_000.0, 532_860_000.0, 406_027_000.0, 292_583_000.0, 193_683_000.0,
    110_934_000.0, 46_831_000.0,
];

const T_STEP_C: f64 = 10.0;
const T_MIN_C: f64 = 0.0;
const T_MAX_C: f64 = 360.0;

/// Linear interpolation of the bulk-modulus table, clamped at the table
/// endpoints. `k_max`, if given, is applied as a tanh-smoothed soft cap so
/// the solver never sees a discontinuous clamp.
pub fn bulk_modulus_pa(t_celsius: f64, k_max: Option<f64>) -> f64 {
    let t = t_celsius.clamp(T_MIN_C, T_MAX_C);
    let idx_f = (t - T_MIN_C) / T_STEP_C;
    let i0 = idx_f.floor() as usize;
    let i0 = i0.min(K_TABLE_PA.len() - 2);
    let i1 = i0 + 1;
    let t0 = T_MIN_C + i0 as f64 * T_STEP_C;
    let t1 = T_MIN_C + i1 as f64 * T_STEP_C;
    let k = pwr_core::lerp(t, t0, K_TABLE_PA[i0], t1, K_TABLE_PA[i1]);

    match k_max {
        Some(cap) if cap > 0.0 => soft_cap(k, cap),
        _ => k,
    }
}

/// Smoothly caps `k` below `cap` using tanh, matching the linear value for
/// k << cap and asymptoting to cap as k grows.
fn soft_cap(k: f64, cap: f64) -> f64 {
    if k <= 0.0 {
        return k;
    }
    cap * (k / cap).tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_table_rows() {
        let k5 = bulk_modulus_pa(5.0, None);
        assert!(k5 > K_TABLE_PA[0] && k5 < K_TABLE_PA[1]);
    }

    #[test]
    fn clamps_outside_table_range() {
        assert_eq!(bulk_modulus_pa(-50.0, None), K_TABLE_PA[0]);
        assert_eq!(
            bulk_modulus_pa(500.0, None),
            *K_TABLE_PA.last().unwrap()
        );
    }

    #[test]
    fn soft_cap_limits_output() {
        let capped = bulk_modulus_pa(50.0, Some(1.0e9));
        assert!(capped < 1.0e9);
        assert!(capped > 0.0);
    }

    #[test]
    fn no_cap_when_k_max_none() {
        let uncapped = bulk_modulus_pa(50.0, None);
        assert!(uncapped > 2.0e9);
    }
}
