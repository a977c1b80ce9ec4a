//! unitconv Core - Fundamental types
//!
//! This crate provides the types shared by the table, the engine and the
//! interactive front end:
//! - `ConvertError`: lookup, input and table errors
//! - `codes`: machine-readable error codes

mod error;

pub use error::{codes, ConvertError};

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{ConvertError, Result};
}
