//! Identifier types for values interpolated into filter clauses

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role an identifier plays in a clause. Each role has its own allowed
/// character set, see [`crate::sanitize::is_allowed_char`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Metric (measurement) name
    Name,
    /// Tenant id
    Tenant,
    /// Region
    Region,
    /// Dimension key, interpolated unquoted
    DimensionKey,
    /// Dimension value
    DimensionValue,
}

impl IdentifierKind {
    /// Whether the identifier appears unquoted in the generated clause
    pub fn is_bare(&self) -> bool {
        matches!(self, IdentifierKind::DimensionKey)
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IdentifierKind::Name => "metric name",
            IdentifierKind::Tenant => "tenant id",
            IdentifierKind::Region => "region",
            IdentifierKind::DimensionKey => "dimension key",
            IdentifierKind::DimensionValue => "dimension value",
        };
        write!(f, "{}", s)
    }
}

/// A string token that has passed sanitization.
///
/// Only [`crate::sanitize::Sanitizer`] constructs these, so holding an
/// `Identifier` means every character is in the allowed set for its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    value: String,
    kind: IdentifierKind,
}

impl Identifier {
    /// Wrap a value without checking it.
    ///
    /// `value` must already have passed [`crate::sanitize::Sanitizer::validate`]
    /// for the same `kind`. Every other method relies on that, so outside
    /// tests only [`crate::sanitize::Sanitizer::identifier`] calls this.
    pub(crate) fn new_unchecked<S: Into<String>>(value: S, kind: IdentifierKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The role this identifier was validated for
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Always false for a validated identifier
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Consume the identifier, returning the inner string
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl PartialEq<String> for Identifier {
    fn eq(&self, other: &String) -> bool {
        &self.value == other
    }
}
