// internal imports
use crate::chemistry::molecule::PROTON_MASS;
use crate::mass::convert::{to_float, to_int};

/// Calculates the neutral mass of a precursor from its m/z and charge,
/// `(mz - proton) * charge`.
///
/// # Arguments
/// * `mz` - Observed m/z
/// * `charge` - Precursor charge
///
pub fn neutral_mass(mz: f64, charge: u8) -> f64 {
    (mz - to_float(PROTON_MASS)) * charge as f64
}

/// Calculates the m/z of an ion of the given neutral mass (internal representation) and charge
///
/// # Arguments
/// * `mass` - Neutral mass
/// * `charge` - Charge
///
pub fn mass_to_mz(mass: i64, charge: u8) -> i64 {
    let charge = charge.max(1) as i64;
    (mass + PROTON_MASS * charge) / charge
}

/// Mass error in ppm of an observed neutral mass relative to the calculated mass
///
/// # Arguments
/// * `calculated_mass` - Theoretical mass (internal representation)
/// * `observed_mass` - Observed neutral mass (internal representation)
///
pub fn ppm_error(calculated_mass: i64, observed_mass: i64) -> f64 {
    if calculated_mass == 0 {
        return 0.0;
    }
    (calculated_mass - observed_mass) as f64 / calculated_mass as f64 * 1_000_000.0
}

/// Returns the neutral mass for the given m/z and charge in internal representation
///
pub fn neutral_mass_int(mz: f64, charge: u8) -> i64 {
    to_int(neutral_mass(mz, charge))
}
