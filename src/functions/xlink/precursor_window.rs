// std imports
use std::fmt::Display;
use std::str::FromStr;

// 3rd party imports
use serde::{Deserialize, Serialize};

// internal imports
use crate::chemistry::molecule::PROTON_MASS;
use crate::entities::configuration::SearchConfiguration;
use crate::errors::search_error::SearchError;
use crate::mass::convert::{to_float, to_int};

/// Unit of the cross-link precursor window
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecursorWindowType {
    /// Absolute window on the neutral mass (Dalton)
    #[default]
    Mass,
    /// Absolute window on the m/z (Thomson)
    Mz,
    /// Relative window in parts per million
    Ppm,
}

impl FromStr for PrecursorWindowType {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mass" => Ok(Self::Mass),
            "mz" => Ok(Self::Mz),
            "ppm" => Ok(Self::Ppm),
            _ => Err(SearchError::ConstraintViolation(format!(
                "unknown precursor window type '{}'",
                s
            ))),
        }
    }
}

impl Display for PrecursorWindowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mass => write!(f, "mass"),
            Self::Mz => write!(f, "mz"),
            Self::Ppm => write!(f, "ppm"),
        }
    }
}

/// Precursor window for cross-linked pairs
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XLinkPrecursorWindow {
    window: f64,
    window_type: PrecursorWindowType,
}

impl XLinkPrecursorWindow {
    pub fn new(window: f64, window_type: PrecursorWindowType) -> Self {
        Self {
            window,
            window_type,
        }
    }

    pub fn from_configuration(config: &SearchConfiguration) -> Self {
        Self::new(config.get_xlink_window(), config.get_xlink_window_type())
    }

    pub fn get_window(&self) -> f64 {
        self.window
    }

    pub fn get_window_type(&self) -> PrecursorWindowType {
        self.window_type
    }

    /// Returns the inclusive neutral mass range (min, max) of the window around the precursor
    ///
    /// # Arguments
    /// * `precursor_mz` - Precursor m/z
    /// * `charge` - Precursor charge
    ///
    pub fn get_min_max_mass(&self, precursor_mz: f64, charge: u8) -> (i64, i64) {
        let charge_f = charge as f64;
        let proton = to_float(PROTON_MASS);
        let mass = (precursor_mz - proton) * charge_f;
        let (min_mass, max_mass) = match self.window_type {
            PrecursorWindowType::Mass => (mass - self.window, mass + self.window),
            PrecursorWindowType::Mz => (
                (precursor_mz - self.window - proton) * charge_f,
                (precursor_mz + self.window - proton) * charge_f,
            ),
            PrecursorWindowType::Ppm => (
                mass / (1.0 + self.window * 1e-6),
                mass / (1.0 - self.window * 1e-6),
            ),
        };
        (to_int(min_mass), to_int(max_mass))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PRECURSOR_MZ: f64 = 500.5;

    fn neutral() -> f64 {
        (PRECURSOR_MZ - to_float(PROTON_MASS)) * 2.0
    }

    #[test]
    fn test_mass_window() {
        let window = XLinkPrecursorWindow::new(3.0, PrecursorWindowType::Mass);
        let (min, max) = window.get_min_max_mass(PRECURSOR_MZ, 2);
        assert!((to_float(min) - (neutral() - 3.0)).abs() < 1e-6);
        assert!((to_float(max) - (neutral() + 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_mz_window() {
        // m/z window is scaled by the charge
        let window = XLinkPrecursorWindow::new(0.5, PrecursorWindowType::Mz);
        let (min, max) = window.get_min_max_mass(PRECURSOR_MZ, 2);
        assert!((to_float(min) - (neutral() - 1.0)).abs() < 1e-6);
        assert!((to_float(max) - (neutral() + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_ppm_window() {
        let window = XLinkPrecursorWindow::new(10.0, PrecursorWindowType::Ppm);
        let (min, max) = window.get_min_max_mass(PRECURSOR_MZ, 2);
        assert!((to_float(min) - neutral() / 1.00001).abs() < 1e-6);
        assert!((to_float(max) - neutral() / 0.99999).abs() < 1e-6);
        assert!(min < to_int(neutral()) && to_int(neutral()) < max);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(PrecursorWindowType::from_str("PPM").unwrap(), PrecursorWindowType::Ppm);
        assert!(PrecursorWindowType::from_str("percent").is_err());
        assert_eq!(
            serde_json::to_string(&PrecursorWindowType::Mz).unwrap(),
            "\"mz\""
        );
    }
}
