/// Constant factor for float conversion to integer (nano Dalton).
pub const MASS_CONVERT_FACTOR: f64 = 1000000000.0;

/// Converts a mass (Dalton) into the internal integer representation.
///
/// # Arguments
///
/// * `mass` - Mass in Dalton
///
pub fn to_int(mass: f64) -> i64 {
    (mass * MASS_CONVERT_FACTOR) as i64
}

/// Makro for mass to integer conversion which can be used in assignments of constants,
/// where `to_int` is not available.
/// Attention: The argument is casted to f64, make sure to pass a number.
///
#[allow(unused_macros)]
macro_rules! mass_to_int {
    ($mass:expr) => {{
        ($mass as f64 * crate::mass::convert::MASS_CONVERT_FACTOR) as i64
    }};
}

/// Converts a mass from the internal integer representation to Dalton.
///
/// # Arguments
///
/// * `mass` - Mass in internal representation
///
pub fn to_float(mass: i64) -> f64 {
    mass as f64 / MASS_CONVERT_FACTOR
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mass_int_float_conversion() {
        const DALTON_FLOAT: f64 = 859.49506802369;
        // nano Dalton precision, the last two decimal places are cut off
        const EXPECTED_DALTON_INT_CONVERSION: i64 = 859495068023;
        const EXPECTED_DALTON_FLOAT_CONVERSION: f64 = 859.495068023;

        let dalton_int: i64 = to_int(DALTON_FLOAT);
        assert_eq!(dalton_int, EXPECTED_DALTON_INT_CONVERSION);
        let dalton_float: f64 = to_float(dalton_int);
        assert_eq!(dalton_float, EXPECTED_DALTON_FLOAT_CONVERSION);
    }

    #[test]
    /// Macros are imported in crate root, so they are tested here.
    fn test_mass_to_int_macro() {
        const WATER: i64 = mass_to_int!(18.0105646837_f64);
        assert_eq!(WATER, 18010564683);
    }
}
