// pwr-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Energy as UomEnergy, Length as UomLength, Mass as UomMass,
    MassDensity as UomMassDensity, MassRate as UomMassRate, Power as UomPower,
    Pressure as UomPressure, Ratio as UomRatio, ThermodynamicTemperature as UomTemperature,
    Time as UomTime,
};

// Public canonical unit types (SI, f64). Quantities that uom does not model
// cleanly (specific internal energy, specific volume, reactivity) stay as
// plain `f64` with doc comments, the way `tf_fluids::SpecEnthalpy` does.
pub type Area = UomArea;
pub type Energy = UomEnergy;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Power = UomPower;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomTemperature;
pub type Time = UomTime;

/// Specific internal energy [J/kg]. Not part of uom's standard set.
pub type SpecEnergy = f64;
/// Specific volume [m^3/kg]. Not part of uom's standard set.
pub type SpecVolume = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    /// Standard gravity (m/s^2).
    pub const G0_MPS2: f64 = 9.806_65;
    /// Universal gas constant (J/(mol*K)).
    pub const R_UNIVERSAL: f64 = 8.314_462_618;
    /// Stefan-Boltzmann constant, unused by conduction/convection but kept
    /// alongside the other physical constants used by the operator set.
    pub const SIGMA_SB: f64 = 5.670_374_419e-8;
    /// Water's critical temperature (K).
    pub const T_CRIT_K: f64 = 647.096;
    /// Water's triple-point temperature (K).
    pub const T_TRIPLE_K: f64 = 273.16;
    /// Water's critical pressure (Pa).
    pub const P_CRIT_PA: f64 = 22.064e6;
    /// Water's critical density (kg/m^3).
    pub const RHO_CRIT: f64 = 322.0;
    /// Water's critical specific volume (m^3/kg).
    pub const V_CRIT: f64 = 1.0 / RHO_CRIT;
    /// Water's critical specific internal energy (J/kg), approximate.
    pub const U_CRIT_J_PER_KG: f64 = 2_015_000.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _m = kg(10.0);
        let _l = m(2.0);
        let _dt = s(0.1);
        let _r = unitless(0.5);
    }
}
