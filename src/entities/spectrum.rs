// internal imports
use crate::mass::charge::neutral_mass_int;

/// Centroided peak
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// Observed MS2 spectrum, reduced to what the search needs.
/// Parsing of spectrum files happens elsewhere.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    id: String,
    precursor_mz: f64,
    charges: Vec<u8>,
    peaks: Vec<Peak>,
}

impl Spectrum {
    /// Creates a new spectrum, peaks are sorted by m/z
    ///
    /// # Arguments
    /// * `id` - Identifier, e.g. the scan number
    /// * `precursor_mz` - Precursor m/z
    /// * `charges` - Charges to search the spectrum with
    /// * `peaks` - Fragment peaks
    ///
    pub fn new(id: String, precursor_mz: f64, charges: Vec<u8>, mut peaks: Vec<Peak>) -> Self {
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self {
            id,
            precursor_mz,
            charges,
            peaks,
        }
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_precursor_mz(&self) -> f64 {
        self.precursor_mz
    }

    pub fn get_charges(&self) -> &[u8] {
        &self.charges
    }

    pub fn get_peaks(&self) -> &[Peak] {
        &self.peaks
    }

    /// Neutral precursor mass for the given charge in internal representation
    ///
    pub fn get_neutral_mass(&self, charge: u8) -> i64 {
        neutral_mass_int(self.precursor_mz, charge)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mass::convert::to_float as mass_to_float;

    #[test]
    fn test_neutral_mass() {
        let spectrum = Spectrum::new(
            "scan=1".to_string(),
            500.5,
            vec![2, 3],
            vec![
                Peak { mz: 300.0, intensity: 1.0 },
                Peak { mz: 200.0, intensity: 2.0 },
            ],
        );
        assert_eq!(spectrum.get_peaks()[0].mz, 200.0);
        let mass = mass_to_float(spectrum.get_neutral_mass(2));
        assert!((mass - 998.985447).abs() < 0.00001);
    }
}
