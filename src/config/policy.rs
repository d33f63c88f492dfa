//! Lending policy configuration loading from config.toml
//!
//! The lending policy carries the fixed per-installment interest rate and the
//! default installment count offered in the origination workflow. A missing
//! config file falls back to the built-in policy (15% per installment, 3
//! installments by default); the [2, 6] installment bounds are a domain
//! invariant, not policy, and are enforced in `core::schedule`.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Lending policy section
    pub policy: LendingPolicy,
}

/// Lending policy parameters
#[derive(Debug, Deserialize, Clone)]
pub struct LendingPolicy {
    /// Fixed nominal interest rate applied per installment
    pub rate_per_installment: f64,
    /// Installment count pre-selected in the origination workflow
    pub default_installment_count: i32,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            rate_per_installment: 0.15,
            default_installment_count: 3,
        }
    }
}

/// Loads lending policy configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the lending policy from the default location (./config.toml),
/// falling back to the built-in policy when the file does not exist.
pub fn load_default_policy() -> Result<LendingPolicy> {
    if Path::new("config.toml").exists() {
        Ok(load_config("config.toml")?.policy)
    } else {
        Ok(LendingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_policy_config() {
        let toml_str = r"
            [policy]
            rate_per_installment = 0.15
            default_installment_count = 3
        ";

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.policy.rate_per_installment, 0.15);
        assert_eq!(config.policy.default_installment_count, 3);
    }

    #[test]
    fn test_default_policy() {
        let policy = LendingPolicy::default();
        assert_eq!(policy.rate_per_installment, 0.15);
        assert_eq!(policy.default_installment_count, 3);
    }
}
