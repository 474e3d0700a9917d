// internal imports
use crate::chemistry::mass_basis::MassBasis;

/// Monoisotopic mass of water
pub const WATER_MONO_MASS: i64 = mass_to_int!(18.0105646837_f64);
/// Average mass of water
pub const WATER_AVERAGE_MASS: i64 = mass_to_int!(18.01528_f64);
/// Mass of a proton
pub const PROTON_MASS: i64 = mass_to_int!(1.007276466812_f64);

/// Returns the water mass for the given mass basis
///
/// # Arguments
/// * `mass_basis` - Average or monoisotopic
///
pub fn get_water_mass(mass_basis: MassBasis) -> i64 {
    match mass_basis {
        MassBasis::Average => WATER_AVERAGE_MASS,
        MassBasis::Monoisotopic => WATER_MONO_MASS,
    }
}
