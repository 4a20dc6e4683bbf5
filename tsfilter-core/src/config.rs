//! Limits applied while building clauses

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use validator::Validate;

use crate::error::{FilterError, FilterResult};

/// Tunable limits for the sanitizer and statement builders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClauseLimits {
    /// Maximum identifier length in bytes
    #[validate(range(min = 1, max = 4096))]
    pub max_identifier_length: usize,

    /// Maximum number of dimensions in one filter
    #[validate(range(min = 1))]
    pub max_dimensions: usize,

    /// Statistics period used when the caller does not supply one
    #[validate(range(min = 1))]
    pub default_period_secs: u64,

    /// Largest row limit a statement may carry
    #[validate(range(min = 1))]
    pub max_limit: usize,
}

impl Default for ClauseLimits {
    fn default() -> Self {
        Self {
            max_identifier_length: crate::MAX_IDENTIFIER_LENGTH,
            max_dimensions: crate::MAX_DIMENSIONS,
            default_period_secs: crate::DEFAULT_PERIOD_SECS,
            max_limit: crate::MAX_LIMIT,
        }
    }
}

impl ClauseLimits {
    /// Load limits from environment variables, falling back to defaults
    pub fn load() -> FilterResult<Self> {
        let mut limits = Self::default();

        if let Some(v) = env_var("TSFILTER_MAX_IDENTIFIER_LENGTH")? {
            limits.max_identifier_length = v;
        }

        if let Some(v) = env_var("TSFILTER_MAX_DIMENSIONS")? {
            limits.max_dimensions = v;
        }

        if let Some(v) = env_var("TSFILTER_DEFAULT_PERIOD_SECS")? {
            limits.default_period_secs = v;
        }

        if let Some(v) = env_var("TSFILTER_MAX_LIMIT")? {
            limits.max_limit = v;
        }

        limits.validate_self()?;
        Ok(limits)
    }

    /// Validate the limits
    pub fn validate_self(&self) -> FilterResult<()> {
        self.validate()
            .map_err(|e| FilterError::configuration(format!("Invalid clause limits: {}", e)))?;

        Ok(())
    }
}

fn env_var<T: FromStr>(name: &str) -> FilterResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| FilterError::configuration(format!("{}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_are_valid() {
        let limits = ClauseLimits::default();
        assert!(limits.validate_self().is_ok());
        assert_eq!(limits.max_identifier_length, 255);
        assert_eq!(limits.default_period_secs, 300);
    }

    #[test]
    fn test_zero_limits_rejected() {
        let limits = ClauseLimits {
            max_identifier_length: 0,
            ..ClauseLimits::default()
        };
        assert!(matches!(
            limits.validate_self(),
            Err(FilterError::Configuration(_))
        ));

        let limits = ClauseLimits {
            max_limit: 0,
            ..ClauseLimits::default()
        };
        assert!(limits.validate_self().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let limits: ClauseLimits = serde_json::from_str(r#"{"max_dimensions": 5}"#).unwrap();
        assert_eq!(limits.max_dimensions, 5);
        assert_eq!(limits.max_limit, ClauseLimits::default().max_limit);
    }

    #[test]
    fn test_load_from_env() {
        // Only this test touches TSFILTER_MAX_DIMENSIONS
        std::env::set_var("TSFILTER_MAX_DIMENSIONS", "7");
        let loaded = ClauseLimits::load();

        std::env::set_var("TSFILTER_MAX_DIMENSIONS", "0");
        let rejected = ClauseLimits::load();

        std::env::remove_var("TSFILTER_MAX_DIMENSIONS");

        let limits = loaded.unwrap();
        assert_eq!(limits.max_dimensions, 7);
        assert_eq!(limits.max_limit, ClauseLimits::default().max_limit);
        assert!(matches!(rejected, Err(FilterError::Configuration(_))));
    }

    #[test]
    fn test_env_var_parse_error() {
        // Variable is private to this test
        std::env::set_var("TSFILTER_TEST_BOGUS_NUMBER", "not-a-number");
        let parsed: FilterResult<Option<usize>> = env_var("TSFILTER_TEST_BOGUS_NUMBER");
        assert!(matches!(parsed, Err(FilterError::Configuration(_))));

        let missing: FilterResult<Option<usize>> = env_var("TSFILTER_TEST_NOT_SET");
        assert_eq!(missing, Ok(None));
    }
}
