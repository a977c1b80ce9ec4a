//! Conversion engine
//!
//! `convert(category, from, to, value)` resolves both units in the table and
//! dispatches on their conversion kinds:
//! - linear units go through the category's base unit,
//! - temperature units go through Celsius, always in two steps.

use unitconv_core::{ConvertError, Result};
use crate::kind::ConversionKind;
use crate::table::ConversionTable;

impl ConversionTable {
    /// Convert `value` from `from_unit` to `to_unit` within `category`
    pub fn convert(&self, category: &str, from_unit: &str, to_unit: &str, value: f64) -> Result<f64> {
        let from = self.lookup(category, from_unit)?;
        let to = self.lookup(category, to_unit)?;

        if !value.is_finite() {
            return Err(ConvertError::invalid_input(format!(
                "value must be a finite number, got {}",
                value
            )));
        }

        let result = apply(from, to, value).ok_or_else(|| {
            ConvertError::invalid_table(format!(
                "units '{}' and '{}' in '{}' have incompatible kinds",
                from_unit, to_unit, category
            ))
        })?;

        if !result.is_finite() {
            return Err(ConvertError::invalid_input(format!(
                "{} {} is out of range in {}",
                value, from_unit, to_unit
            )));
        }
        Ok(result)
    }
}

/// Apply a conversion between two kinds, `None` if they cannot be combined
pub fn apply(from: &ConversionKind, to: &ConversionKind, value: f64) -> Option<f64> {
    match (from, to) {
        (ConversionKind::Linear { factor: f }, ConversionKind::Linear { factor: t }) => {
            Some(value * f / t)
        }
        (
            ConversionKind::AffineTemperature { scale: f },
            ConversionKind::AffineTemperature { scale: t },
        ) => Some(t.from_celsius(f.to_celsius(value))),
        _ => None,
    }
}
