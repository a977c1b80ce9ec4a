//! Runtime configuration from environment variables

use std::env;
use std::path::PathBuf;
use tracing::warn;

pub const TABLE_VAR: &str = "UNITCONV_TABLE";
pub const DECIMALS_VAR: &str = "UNITCONV_DECIMALS";
pub const CHART_WIDTH_VAR: &str = "UNITCONV_CHART_WIDTH";

const DEFAULT_DECIMALS: usize = 4;
const MAX_DECIMALS: usize = 12;
const DEFAULT_CHART_WIDTH: usize = 40;
const MAX_CHART_WIDTH: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Alternate JSON table, `None` for the built-in one
    pub table_path: Option<PathBuf>,
    /// Decimal places in formatted values
    pub decimals: usize,
    /// Length of the longest bar, in cells
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_path: None,
            decimals: DEFAULT_DECIMALS,
            chart_width: DEFAULT_CHART_WIDTH,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; invalid values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_path = lookup(TABLE_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Config {
            table_path,
            decimals: bounded(lookup(DECIMALS_VAR), DECIMALS_VAR, 0, MAX_DECIMALS, DEFAULT_DECIMALS),
            chart_width: bounded(lookup(CHART_WIDTH_VAR), CHART_WIDTH_VAR, 1, MAX_CHART_WIDTH, DEFAULT_CHART_WIDTH),
        }
    }
}

fn bounded(raw: Option<String>, key: &str, min: usize, max: usize, default: usize) -> usize {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if (min..=max).contains(&n) => n,
        _ => {
            warn!(key, value = %raw, min, max, fallback = default, "ignoring out-of-range setting");
            default
        }
    }
}
