//! Conversion errors
//!
//! Every failure is surfaced to the caller. Nothing here is retried or
//! replaced by a default: an unknown unit is a caller mistake, not a
//! transient condition.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const INVALID_TABLE: &str = "INVALID_TABLE";
    pub const TABLE_PARSE: &str = "TABLE_PARSE";
    pub const TABLE_READ: &str = "TABLE_READ";
}

/// Error type for table lookups and conversions
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown unit '{unit}' in category '{category}'")]
    UnknownUnit { category: String, unit: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid conversion table: {0}")]
    InvalidTable(String),

    #[error("Cannot decode conversion table: {0}")]
    TableParse(#[from] serde_json::Error),

    #[error("Cannot read conversion table: {0}")]
    TableRead(#[from] std::io::Error),
}

impl ConvertError {
    pub fn unknown_category(category: impl Into<String>) -> Self {
        Self::UnknownCategory(category.into())
    }

    pub fn unknown_unit(category: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::UnknownUnit {
            category: category.into(),
            unit: unit.into(),
        }
    }

    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::InvalidInput(details.into())
    }

    pub fn invalid_table(details: impl Into<String>) -> Self {
        Self::InvalidTable(details.into())
    }

    /// True for both lookup failures (category or unit absent)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownCategory(_) | Self::UnknownUnit { .. })
    }

    /// Machine-readable code, see [`codes`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCategory(_) | Self::UnknownUnit { .. } => codes::NOT_FOUND,
            Self::InvalidInput(_) => codes::INVALID_INPUT,
            Self::InvalidTable(_) => codes::INVALID_TABLE,
            Self::TableParse(_) => codes::TABLE_PARSE,
            Self::TableRead(_) => codes::TABLE_READ,
        }
    }

    /// Suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnknownCategory(_) => Some("Use 'categories' to list available categories"),
            Self::UnknownUnit { .. } => Some("Use 'units' to list the units of the category"),
            Self::InvalidInput(_) => Some("Enter a finite number such as 42, -3.5 or 1,000.25"),
            Self::InvalidTable(_) | Self::TableParse(_) => {
                Some("Check the table records: kind, factor or scale, and category names")
            }
            Self::TableRead(_) => Some("Check the UNITCONV_TABLE path"),
        }
    }
}
