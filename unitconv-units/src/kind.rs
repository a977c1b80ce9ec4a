//! Conversion kinds: how one unit relates to its category's reference point

use std::fmt;
use serde::{Serialize, Deserialize};

/// Temperature scales. Conversion between them is affine, so they cannot
/// share the scale-factor representation of linear units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureScale {
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "K")]
    Kelvin,
}

impl TemperatureScale {
    /// Normalize a value on this scale to Celsius
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        }
    }

    /// Express a Celsius value on this scale
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
            TemperatureScale::Kelvin => "K",
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Conversion parameter attached to every unit
///
/// Serialized with an inline `kind` tag so a table record reads
/// `{"kind": "linear", "factor": 1000}` or
/// `{"kind": "affine_temperature", "scale": "F"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionKind {
    /// 1 unit = `factor` base units
    Linear { factor: f64 },
    /// Offset scale, converted through Celsius
    AffineTemperature { scale: TemperatureScale },
}

/// Kind family, used to keep a category homogeneous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFamily {
    Linear,
    Temperature,
}

impl fmt::Display for KindFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindFamily::Linear => write!(f, "linear"),
            KindFamily::Temperature => write!(f, "affine_temperature"),
        }
    }
}

impl ConversionKind {
    pub fn linear(factor: f64) -> Self {
        ConversionKind::Linear { factor }
    }

    pub fn temperature(scale: TemperatureScale) -> Self {
        ConversionKind::AffineTemperature { scale }
    }

    pub fn family(&self) -> KindFamily {
        match self {
            ConversionKind::Linear { .. } => KindFamily::Linear,
            ConversionKind::AffineTemperature { .. } => KindFamily::Temperature,
        }
    }

    /// Check if this is the base unit of a linear category
    pub fn is_base(&self) -> bool {
        matches!(self, ConversionKind::Linear { factor } if *factor == 1.0)
    }

    /// Scale factor for linear units
    pub fn factor(&self) -> Option<f64> {
        match self {
            ConversionKind::Linear { factor } => Some(*factor),
            ConversionKind::AffineTemperature { .. } => None,
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionKind::Linear { factor } => write!(f, "x{}", factor),
            ConversionKind::AffineTemperature { scale } => write!(f, "°{}", scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_to_celsius() {
        assert_eq!(TemperatureScale::Celsius.to_celsius(21.5), 21.5);
        assert_eq!(TemperatureScale::Fahrenheit.to_celsius(32.0), 0.0);
        assert_eq!(TemperatureScale::Fahrenheit.to_celsius(212.0), 100.0);
        assert!(close(TemperatureScale::Kelvin.to_celsius(0.0), -273.15));
    }

    #[test]
    fn test_from_celsius() {
        assert_eq!(TemperatureScale::Fahrenheit.from_celsius(100.0), 212.0);
        assert_eq!(TemperatureScale::Fahrenheit.from_celsius(-40.0), -40.0);
        assert_eq!(TemperatureScale::Kelvin.from_celsius(0.0), 273.15);
    }

    #[test]
    fn test_base_unit() {
        assert!(ConversionKind::linear(1.0).is_base());
        assert!(!ConversionKind::linear(1000.0).is_base());
        assert!(!ConversionKind::temperature(TemperatureScale::Celsius).is_base());
    }

    #[test]
    fn test_family() {
        assert_eq!(ConversionKind::linear(0.3048).family(), KindFamily::Linear);
        assert_eq!(
            ConversionKind::temperature(TemperatureScale::Kelvin).family(),
            KindFamily::Temperature
        );
    }

    #[test]
    fn test_serde_tagging() {
        let kind: ConversionKind =
            serde_json::from_str(r#"{"kind": "linear", "factor": 1000}"#).unwrap();
        assert_eq!(kind, ConversionKind::linear(1000.0));

        let kind: ConversionKind =
            serde_json::from_str(r#"{"kind": "affine_temperature", "scale": "F"}"#).unwrap();
        assert_eq!(kind, ConversionKind::temperature(TemperatureScale::Fahrenheit));

        assert!(serde_json::from_str::<ConversionKind>(r#"{"kind": "log", "factor": 2}"#).is_err());
    }
}
