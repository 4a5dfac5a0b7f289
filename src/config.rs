//! Scan configuration.
//!
//! Environment variables:
//! - `CODE_SCAN_FAMILIES`: comma-separated family names (default: all)
//! - `CODE_SCAN_MAX_DIM`: cap on the longer image side, `0` disables
//! - `CODE_SCAN_ALLOW_REDUCED`: `1`/`true`/`yes` to keep going when some
//!   models fail to initialise

use crate::error::{Result, ScanError};
use crate::models::CodeFamily;
use std::collections::BTreeSet;

/// Environment variable selecting the enabled families
pub const FAMILIES_VAR: &str = "CODE_SCAN_FAMILIES";
/// Environment variable capping image size
pub const MAX_DIM_VAR: &str = "CODE_SCAN_MAX_DIM";
/// Environment variable allowing a reduced family set
pub const ALLOW_REDUCED_VAR: &str = "CODE_SCAN_ALLOW_REDUCED";

/// Settings for a scanning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Families to create models for
    pub families: BTreeSet<CodeFamily>,
    /// Longer-side cap applied when loading images
    pub max_dim: Option<u32>,
    /// Proceed with the families whose models initialised instead of failing
    pub allow_reduced_families: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            families: CodeFamily::ALL.into_iter().collect(),
            max_dim: None,
            allow_reduced_families: false,
        }
    }
}

impl ScanConfig {
    /// Config with only `families` enabled
    pub fn with_families(families: impl IntoIterator<Item = CodeFamily>) -> Self {
        Self {
            families: families.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(FAMILIES_VAR) {
            config.families = parse_families(&value)?;
        }

        if let Some(value) = lookup(MAX_DIM_VAR) {
            config.max_dim = match value.trim().parse::<u32>() {
                Ok(0) => None,
                Ok(v) => Some(v),
                Err(_) => {
                    return Err(ScanError::Config {
                        message: format!("{MAX_DIM_VAR} must be an integer, got '{value}'"),
                    });
                }
            };
        }

        if let Some(value) = lookup(ALLOW_REDUCED_VAR) {
            config.allow_reduced_families = parse_flag(&value);
        }

        Ok(config)
    }
}

fn parse_families(value: &str) -> Result<BTreeSet<CodeFamily>> {
    let mut families = BTreeSet::new();
    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let family = CodeFamily::from_name(name).ok_or_else(|| ScanError::Config {
            message: format!("unknown code family '{name}' in {FAMILIES_VAR}"),
        })?;
        families.insert(family);
    }
    if families.is_empty() {
        return Err(ScanError::Config {
            message: format!("{FAMILIES_VAR} enables no families"),
        });
    }
    Ok(families)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
