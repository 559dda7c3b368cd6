//! Non-condensible gas composition and its Dalton's-law partial pressure.

use pwr_core::numeric::ensure_positive;
use pwr_core::units::constants::R_UNIVERSAL;

/// Amounts of non-condensible species present in a flow node's volume, in
/// moles. Species are identified by name (`"N2"`, `"O2"`, ...) rather than
/// an enum, matching the optional/open-ended composition in spec §3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NcgComposition {
    species_mol: Vec<(String, f64)>,
}

impl NcgComposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mol(&mut self, species: &str, mol: f64) {
        if let Some((_, n)) = self.species_mol.iter_mut().find(|(s, _)| s == species) {
            *n += mol;
        } else {
            self.species_mol.push((species.to_string(), mol));
        }
    }

    pub fn total_mol(&self) -> f64 {
        self.species_mol.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.species_mol.is_empty() || self.total_mol() <= 0.0
    }

    /// Dalton's law: each species contributes n_i*R*T/V independently of
    /// the others; summing gives the total NCG partial pressure.
    pub fn partial_pressure_pa(&self, volume_m3: f64, temperature_k: f64) -> pwr_core::CoreResult<f64> {
        let v = ensure_positive(volume_m3, "ncg volume")?;
        let t = ensure_positive(temperature_k, "ncg temperature")?;
        let n = self.total_mol();
        Ok(n * R_UNIVERSAL * t / v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_species_partial_pressure_matches_ideal_gas_law() {
        let mut ncg = NcgComposition::new();
        ncg.add_mol("N2", 1.0);
        let p = ncg.partial_pressure_pa(1.0, 350.0).unwrap();
        // 1 * 8.314 * 350 / 1 ~= 2910 Pa (spec scenario S1).
        assert!((p - 2910.0).abs() < 1.0);
    }

    #[test]
    fn mixture_sums_species_contributions() {
        let mut ncg = NcgComposition::new();
        ncg.add_mol("N2", 0.78);
        ncg.add_mol("O2", 0.21);
        let p = ncg.partial_pressure_pa(0.5, 400.0).unwrap();
        // 0.99 * 8.314 * 400 / 0.5 ~= 6586 Pa (spec scenario S2).
        let expected = 6586.0;
        assert!((p - expected).abs() / expected < 0.002);
    }

    #[test]
    fn empty_composition_has_zero_pressure() {
        let ncg = NcgComposition::new();
        assert_eq!(ncg.partial_pressure_pa(1.0, 300.0).unwrap(), 0.0);
        assert!(ncg.is_empty());
    }

    #[test]
    fn rejects_non_positive_volume() {
        let ncg = NcgComposition::new();
        assert!(ncg.partial_pressure_pa(0.0, 300.0).is_err());
    }
}
