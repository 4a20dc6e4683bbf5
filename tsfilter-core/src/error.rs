//! Error types for filter clause construction

use std::fmt;

use thiserror::Error;

use crate::identifier::IdentifierKind;

/// Result type for filter clause operations
pub type FilterResult<T> = Result<T, FilterError>;

/// Why an identifier was rejected by the sanitizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No value was supplied
    Missing,
    /// The value was the empty string
    Empty,
    /// The value exceeds the configured maximum length (in bytes)
    TooLong { length: usize, max: usize },
    /// The value contains a character outside the allowed set.
    /// `position` counts characters, not bytes.
    DisallowedCharacter { character: char, position: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Missing => write!(f, "value is missing"),
            Rejection::Empty => write!(f, "value is empty"),
            Rejection::TooLong { length, max } => {
                write!(f, "value too long: {} > {}", length, max)
            }
            Rejection::DisallowedCharacter {
                character,
                position,
            } => write!(
                f,
                "disallowed character {:?} at position {}",
                character, position
            ),
        }
    }
}

/// Error types for building filter clauses and statements
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid {kind}: {reason}")]
    InvalidIdentifier {
        kind: IdentifierKind,
        reason: Rejection,
    },

    #[error("Found invalid tenant id: a tenant id is required")]
    MissingTenant,

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Invalid statistic: {0}")]
    InvalidStatistic(String),

    #[error("Invalid period: {0}s")]
    InvalidPeriod(u64),

    #[error("Invalid limit: {0}")]
    InvalidLimit(usize),

    #[error("Invalid {name} flag: expected true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("Time range error: {0}")]
    TimeRange(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FilterError {
    /// Create a new invalid identifier error
    pub fn invalid_identifier(kind: IdentifierKind, reason: Rejection) -> Self {
        Self::InvalidIdentifier { kind, reason }
    }

    /// Create a new invalid dimension error
    pub fn invalid_dimension<S: Into<String>>(message: S) -> Self {
        Self::InvalidDimension(message.into())
    }

    /// Create a new invalid statistic error
    pub fn invalid_statistic<S: Into<String>>(message: S) -> Self {
        Self::InvalidStatistic(message.into())
    }

    /// Create a new invalid flag error
    pub fn invalid_flag<S: Into<String>>(name: &'static str, value: S) -> Self {
        Self::InvalidFlag {
            name,
            value: value.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error was caused by caller-supplied input, as opposed to
    /// a misconfigured builder. API layers map these to a 4xx response.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FilterError::Configuration(_))
    }

    /// Get the error category for monitoring/metrics
    pub fn category(&self) -> &'static str {
        match self {
            FilterError::InvalidIdentifier { .. } => "invalid_identifier",
            FilterError::MissingTenant => "missing_tenant",
            FilterError::InvalidDimension(_) => "invalid_dimension",
            FilterError::InvalidStatistic(_) => "invalid_statistic",
            FilterError::InvalidPeriod(_) => "invalid_period",
            FilterError::InvalidLimit(_) => "invalid_limit",
            FilterError::InvalidFlag { .. } => "invalid_flag",
            FilterError::TimeRange(_) => "time_range",
            FilterError::Configuration(_) => "configuration",
        }
    }
}
