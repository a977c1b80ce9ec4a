//! unitconv Units - Conversion table and engine
//!
//! A fixed table of units grouped in categories. Each unit carries either a
//! linear scale factor relative to its category's base unit, or a
//! temperature scale tag for the affine Temperature category.
//!
//! Categories:
//! - Length (Meters, Kilometers, Miles, ...)
//! - Weight/Mass (Kilograms, Pounds, Stone, ...)
//! - Temperature (Celsius, Fahrenheit, Kelvin)
//! - Area (Square Meters, Acres, Hectares, ...)
//! - Volume (Cubic Meters, Liters, Gallons (US), ...)
//! - Speed (Meters per Second, Knots, ...)
//! - Time (Seconds, Hours, Years, ...)
//! - Digital Storage (Bytes, Kilobytes, ... binary multiples)
//! - Energy (Joules, Calories, Electron-volts, ...)
//! - Pressure (Pascal, Bar, PSI, ...)

mod kind;
mod table;
mod convert;

pub use kind::{ConversionKind, KindFamily, TemperatureScale};
pub use table::{Category, ConversionTable, UnitEntry, UnitRecord, TABLE};
pub use convert::apply;

use unitconv_core::Result;

/// Convert a value between two units of a category of the built-in table
pub fn convert(category: &str, from_unit: &str, to_unit: &str, value: f64) -> Result<f64> {
    TABLE.convert(category, from_unit, to_unit, value)
}

/// Category names of the built-in table, in fixed order
pub fn categories() -> Vec<&'static str> {
    TABLE.categories()
}

/// Unit names of a built-in category, in fixed order
pub fn units(category: &str) -> Result<Vec<&'static str>> {
    TABLE.units(category)
}
