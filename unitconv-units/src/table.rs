//! Conversion table - categories, their units and each unit's conversion kind
//!
//! The table is built from flat records, validated once, and never mutated
//! afterwards. Category order is order of first appearance in the records;
//! unit order within a category is record order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use serde::{Serialize, Deserialize};
use tracing::debug;
use unitconv_core::{ConvertError, Result};
use crate::kind::{ConversionKind, KindFamily, TemperatureScale};

/// Records shipped with the crate
const BUILTIN_TABLE: &str = include_str!("../data/conversions.json");

/// Global conversion table
pub static TABLE: LazyLock<ConversionTable> = LazyLock::new(ConversionTable::builtin);

/// One row of the external table form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub category: String,
    pub unit: String,
    #[serde(flatten)]
    pub kind: ConversionKind,
}

impl UnitRecord {
    pub fn linear(category: &str, unit: &str, factor: f64) -> Self {
        UnitRecord {
            category: category.to_string(),
            unit: unit.to_string(),
            kind: ConversionKind::linear(factor),
        }
    }

    pub fn temperature(category: &str, unit: &str, scale: TemperatureScale) -> Self {
        UnitRecord {
            category: category.to_string(),
            unit: unit.to_string(),
            kind: ConversionKind::temperature(scale),
        }
    }
}

/// A unit and its conversion parameter
#[derive(Debug, Clone, PartialEq)]
pub struct UnitEntry {
    pub name: String,
    pub kind: ConversionKind,
}

/// A closed set of mutually convertible units
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    family: KindFamily,
    units: Vec<UnitEntry>,
    index: HashMap<String, usize>,
}

impl Category {
    fn new(name: &str, family: KindFamily) -> Self {
        Category {
            name: name.to_string(),
            family,
            units: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> KindFamily {
        self.family
    }

    pub fn units(&self) -> &[UnitEntry] {
        &self.units
    }

    /// Get a unit's conversion kind by exact name
    pub fn get(&self, unit: &str) -> Option<&ConversionKind> {
        self.index.get(unit).map(|&i| &self.units[i].kind)
    }

    /// The factor-1 unit of a linear category
    pub fn base_unit(&self) -> Option<&str> {
        self.units
            .iter()
            .find(|u| u.kind.is_base())
            .map(|u| u.name.as_str())
    }

    fn push(&mut self, unit: &str, kind: ConversionKind) -> Result<()> {
        if kind.family() != self.family {
            return Err(ConvertError::invalid_table(format!(
                "category '{}' mixes {} and {} units (unit '{}')",
                self.name, self.family, kind.family(), unit
            )));
        }
        if self.index.contains_key(unit) {
            return Err(ConvertError::invalid_table(format!(
                "duplicate unit '{}' in category '{}'",
                unit, self.name
            )));
        }
        self.index.insert(unit.to_string(), self.units.len());
        self.units.push(UnitEntry { name: unit.to_string(), kind });
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        match self.family {
            KindFamily::Linear => {
                let base_count = self.units.iter().filter(|u| u.kind.is_base()).count();
                if base_count != 1 {
                    return Err(ConvertError::invalid_table(format!(
                        "category '{}' must have exactly one unit with factor 1, found {}",
                        self.name, base_count
                    )));
                }
            }
            KindFamily::Temperature => {
                let mut seen: Vec<TemperatureScale> = Vec::new();
                for unit in &self.units {
                    if let ConversionKind::AffineTemperature { scale } = unit.kind {
                        if seen.contains(&scale) {
                            return Err(ConvertError::invalid_table(format!(
                                "category '{}' lists scale {} twice",
                                self.name, scale
                            )));
                        }
                        seen.push(scale);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Immutable, validated conversion table
#[derive(Debug, Clone)]
pub struct ConversionTable {
    categories: Vec<Category>,
    index: HashMap<String, usize>,
}

impl ConversionTable {
    /// Build and validate a table from records
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = UnitRecord>,
    {
        let mut table = ConversionTable {
            categories: Vec::new(),
            index: HashMap::new(),
        };

        for record in records {
            check_record(&record)?;
            let slot = match table.index.get(&record.category) {
                Some(&i) => i,
                None => {
                    let i = table.categories.len();
                    table.categories.push(Category::new(&record.category, record.kind.family()));
                    table.index.insert(record.category.clone(), i);
                    i
                }
            };
            table.categories[slot].push(&record.unit, record.kind)?;
        }

        if table.categories.is_empty() {
            return Err(ConvertError::invalid_table("table has no categories"));
        }
        for category in &table.categories {
            category.validate()?;
        }

        debug!(categories = table.categories.len(), "conversion table validated");
        Ok(table)
    }

    /// Parse the JSON record form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<UnitRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Load the JSON record form from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading conversion table");
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// The table shipped with the crate
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_TABLE).expect("built-in conversion table is valid")
    }

    /// Get a category by exact name
    pub fn category(&self, name: &str) -> Result<&Category> {
        self.index
            .get(name)
            .map(|&i| &self.categories[i])
            .ok_or_else(|| ConvertError::unknown_category(name))
    }

    /// Look up a unit's conversion kind
    pub fn lookup(&self, category: &str, unit: &str) -> Result<&ConversionKind> {
        self.category(category)?
            .get(unit)
            .ok_or_else(|| ConvertError::unknown_unit(category, unit))
    }

    /// Category names in table order
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name()).collect()
    }

    /// Unit names of a category in table order
    pub fn units(&self, category: &str) -> Result<Vec<&str>> {
        Ok(self
            .category(category)?
            .units()
            .iter()
            .map(|u| u.name.as_str())
            .collect())
    }

    /// The factor-1 unit of a linear category, `None` for temperature
    pub fn base_unit(&self, category: &str) -> Result<Option<&str>> {
        Ok(self.category(category)?.base_unit())
    }

    /// Iterate categories in table order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

fn check_record(record: &UnitRecord) -> Result<()> {
    if record.category.trim().is_empty() {
        return Err(ConvertError::invalid_table(format!(
            "unit '{}' has an empty category name",
            record.unit
        )));
    }
    if record.unit.trim().is_empty() {
        return Err(ConvertError::invalid_table(format!(
            "category '{}' has a unit with an empty name",
            record.category
        )));
    }
    if let ConversionKind::Linear { factor } = record.kind {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ConvertError::invalid_table(format!(
                "unit '{}' in '{}' has non-positive or non-finite factor {}",
                record.unit, record.category, factor
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length_records() -> Vec<UnitRecord> {
        vec![
            UnitRecord::linear("Length", "Meters", 1.0),
            UnitRecord::linear("Length", "Kilometers", 1000.0),
            UnitRecord::linear("Length", "Feet", 0.3048),
        ]
    }

    #[test]
    fn test_builtin_categories() {
        assert_eq!(
            TABLE.categories(),
            vec![
                "Length",
                "Weight/Mass",
                "Temperature",
                "Area",
                "Volume",
                "Speed",
                "Time",
                "Digital Storage",
                "Energy",
                "Pressure",
            ]
        );
        assert_eq!(TABLE.len(), 10);
    }

    #[test]
    fn test_builtin_length_units() {
        assert_eq!(
            TABLE.units("Length").unwrap(),
            vec![
                "Meters",
                "Kilometers",
                "Centimeters",
                "Millimeters",
                "Miles",
                "Yards",
                "Feet",
                "Inches",
                "Nautical Miles",
            ]
        );
    }

    #[test]
    fn test_builtin_unit_counts() {
        let counts: Vec<(&str, usize)> = TABLE.iter().map(|c| (c.name(), c.units().len())).collect();
        assert_eq!(
            counts,
            vec![
                ("Length", 9),
                ("Weight/Mass", 7),
                ("Temperature", 3),
                ("Area", 7),
                ("Volume", 9),
                ("Speed", 5),
                ("Time", 7),
                ("Digital Storage", 5),
                ("Energy", 7),
                ("Pressure", 6),
            ]
        );
    }

    #[test]
    fn test_builtin_base_units() {
        assert_eq!(TABLE.base_unit("Length").unwrap(), Some("Meters"));
        assert_eq!(TABLE.base_unit("Digital Storage").unwrap(), Some("Bytes"));
        assert_eq!(TABLE.base_unit("Temperature").unwrap(), None);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            TABLE.lookup("Length", "Kilometers").unwrap(),
            &ConversionKind::linear(1000.0)
        );
        assert_eq!(
            TABLE.lookup("Temperature", "Kelvin").unwrap(),
            &ConversionKind::temperature(TemperatureScale::Kelvin)
        );
    }

    #[test]
    fn test_lookup_not_found() {
        let err = TABLE.lookup("Length", "Furlongs").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownUnit { .. }));

        let err = TABLE.lookup("Imaginary", "A").unwrap_err();
        assert!(matches!(err, ConvertError::UnknownCategory(_)));

        assert!(TABLE.units("Imaginary").unwrap_err().is_not_found());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(TABLE.lookup("length", "Meters").is_err());
        assert!(TABLE.lookup("Length", "meters").is_err());
    }

    #[test]
    fn test_from_records_preserves_order() {
        let mut records = length_records();
        records.push(UnitRecord::linear("Time", "Seconds", 1.0));
        records.push(UnitRecord::linear("Length", "Inches", 0.0254));

        let table = ConversionTable::from_records(records).unwrap();
        assert_eq!(table.categories(), vec!["Length", "Time"]);
        assert_eq!(
            table.units("Length").unwrap(),
            vec!["Meters", "Kilometers", "Feet", "Inches"]
        );
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = ConversionTable::from_records(Vec::new()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_bad_factors() {
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut records = length_records();
            records.push(UnitRecord::linear("Length", "Broken", factor));
            assert!(
                matches!(ConversionTable::from_records(records), Err(ConvertError::InvalidTable(_))),
                "factor {} accepted",
                factor
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_unit() {
        let mut records = length_records();
        records.push(UnitRecord::linear("Length", "Feet", 0.3048));
        let err = ConversionTable::from_records(records).unwrap_err();
        assert!(err.to_string().contains("duplicate unit 'Feet'"));
    }

    #[test]
    fn test_same_unit_name_in_two_categories() {
        let records = vec![
            UnitRecord::linear("Length", "Feet", 1.0),
            UnitRecord::linear("Speed", "Feet", 1.0),
        ];
        let table = ConversionTable::from_records(records).unwrap();
        assert!(table.lookup("Speed", "Feet").is_ok());
    }

    #[test]
    fn test_rejects_missing_base_unit() {
        let records = vec![
            UnitRecord::linear("Length", "Kilometers", 1000.0),
            UnitRecord::linear("Length", "Feet", 0.3048),
        ];
        assert!(matches!(
            ConversionTable::from_records(records),
            Err(ConvertError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_rejects_two_base_units() {
        let mut records = length_records();
        records.push(UnitRecord::linear("Length", "Metres", 1.0));
        assert!(matches!(
            ConversionTable::from_records(records),
            Err(ConvertError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_rejects_mixed_kinds() {
        let mut records = length_records();
        records.push(UnitRecord::temperature("Length", "Celsius", TemperatureScale::Celsius));
        let err = ConversionTable::from_records(records).unwrap_err();
        assert!(err.to_string().contains("mixes"));
    }

    #[test]
    fn test_rejects_duplicate_scale() {
        let records = vec![
            UnitRecord::temperature("Temperature", "Celsius", TemperatureScale::Celsius),
            UnitRecord::temperature("Temperature", "Centigrade", TemperatureScale::Celsius),
        ];
        assert!(matches!(
            ConversionTable::from_records(records),
            Err(ConvertError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_rejects_empty_names() {
        let records = vec![UnitRecord::linear("Length", " ", 1.0)];
        assert!(ConversionTable::from_records(records).is_err());

        let records = vec![UnitRecord::linear("", "Meters", 1.0)];
        assert!(ConversionTable::from_records(records).is_err());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"category": "Temperature", "unit": "Celsius", "kind": "affine_temperature", "scale": "C"},
            {"category": "Temperature", "unit": "Kelvin", "kind": "affine_temperature", "scale": "K"},
            {"category": "Storage", "unit": "Bytes", "kind": "linear", "factor": 1},
            {"category": "Storage", "unit": "Kilobytes", "kind": "linear", "factor": 1024}
        ]"#;
        let table = ConversionTable::from_json_str(json).unwrap();
        assert_eq!(table.categories(), vec!["Temperature", "Storage"]);
        assert_eq!(table.lookup("Storage", "Kilobytes").unwrap().factor(), Some(1024.0));
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = ConversionTable::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConvertError::TableParse(_)));

        let err = ConversionTable::from_json_str(
            r#"[{"category": "Length", "unit": "Meters", "kind": "linear"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::TableParse(_)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = ConversionTable::from_path("/nonexistent/unitconv/table.json").unwrap_err();
        assert!(matches!(err, ConvertError::TableRead(_)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("unitconv-table-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"[{"category": "Length", "unit": "Meters", "kind": "linear", "factor": 1}]"#,
        )
        .unwrap();
        let table = ConversionTable::from_path(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(table.units("Length").unwrap(), vec!["Meters"]);
    }

    #[test]
    fn test_records_serialize_back() {
        let record = UnitRecord::temperature("Temperature", "Fahrenheit", TemperatureScale::Fahrenheit);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "affine_temperature");
        assert_eq!(json["scale"], "F");
        assert_eq!(json["unit"], "Fahrenheit");
    }
}
