//! Allowlist sanitization for values interpolated into clauses
//!
//! Every character must come from an explicit allowed set; anything else,
//! including quotes, statement separators, comment markers, whitespace,
//! control characters and non-ASCII letters, is rejected. Values are never
//! escaped or stripped.
//!
//! | Kind | Allowed |
//! |---|---|
//! | dimension key | ASCII letters, digits, `_` |
//! | everything else | ASCII letters, digits, `_` `-` `.` `:` `/` |
//!
//! Dimension keys are written unquoted, so they must also start with a
//! letter or `_`: a valid unquoted InfluxQL identifier.

use tracing::debug;

use crate::config::ClauseLimits;
use crate::error::{FilterError, FilterResult, Rejection};
use crate::identifier::{Identifier, IdentifierKind};

/// Punctuation allowed inside quoted string literals
const QUOTED_PUNCTUATION: &[char] = &['_', '-', '.', ':', '/'];

/// Punctuation allowed in bare (unquoted) identifiers
const BARE_PUNCTUATION: &[char] = &['_'];

/// Check whether a single character may appear in an identifier of `kind`
pub fn is_allowed_char(c: char, kind: IdentifierKind) -> bool {
    if c.is_ascii_alphanumeric() {
        return true;
    }

    if kind.is_bare() {
        BARE_PUNCTUATION.contains(&c)
    } else {
        QUOTED_PUNCTUATION.contains(&c)
    }
}

/// Validate `value` with the default limits, returning it unchanged
pub fn validate(value: Option<&str>, kind: IdentifierKind) -> FilterResult<&str> {
    Sanitizer::default().validate(value, kind)
}

/// Allowlist validator for clause identifiers
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    limits: ClauseLimits,
}

impl Sanitizer {
    /// Create a new sanitizer with custom limits
    pub fn new(limits: ClauseLimits) -> Self {
        Self { limits }
    }

    /// The limits this sanitizer enforces
    pub fn limits(&self) -> &ClauseLimits {
        &self.limits
    }

    /// Validate a required value.
    ///
    /// Returns the input unchanged when it is present, non-empty, within the
    /// length limit and made only of allowed characters.
    pub fn validate<'a>(&self, value: Option<&'a str>, kind: IdentifierKind) -> FilterResult<&'a str> {
        let value = value.ok_or_else(|| reject(kind, Rejection::Missing))?;

        if value.is_empty() {
            return Err(reject(kind, Rejection::Empty));
        }

        if value.len() > self.limits.max_identifier_length {
            return Err(reject(
                kind,
                Rejection::TooLong {
                    length: value.len(),
                    max: self.limits.max_identifier_length,
                },
            ));
        }

        if let Some((position, character)) = first_disallowed(value, kind) {
            return Err(reject(
                kind,
                Rejection::DisallowedCharacter {
                    character,
                    position,
                },
            ));
        }

        Ok(value)
    }

    /// Validate a value that may legitimately be left out.
    ///
    /// Absent and empty values both yield `Ok(None)`.
    pub fn validate_optional<'a>(
        &self,
        value: Option<&'a str>,
        kind: IdentifierKind,
    ) -> FilterResult<Option<&'a str>> {
        match value {
            None | Some("") => Ok(None),
            Some(v) => self.validate(Some(v), kind).map(Some),
        }
    }

    /// Validate a required value and wrap it as an [`Identifier`]
    pub fn identifier(&self, value: Option<&str>, kind: IdentifierKind) -> FilterResult<Identifier> {
        self.validate(value, kind)
            .map(|v| Identifier::new_unchecked(v, kind))
    }

    /// Quick check without building an error
    pub fn is_valid(&self, value: &str, kind: IdentifierKind) -> bool {
        self.validate(Some(value), kind).is_ok()
    }
}

/// Position and character of the first character that breaks the rules for `kind`
fn first_disallowed(value: &str, kind: IdentifierKind) -> Option<(usize, char)> {
    value.chars().enumerate().find(|&(position, c)| {
        let leading_digit = kind.is_bare() && position == 0 && c.is_ascii_digit();
        leading_digit || !is_allowed_char(c, kind)
    })
}

fn reject(kind: IdentifierKind, reason: Rejection) -> FilterError {
    debug!(%kind, %reason, "rejected identifier");
    FilterError::invalid_identifier(kind, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [IdentifierKind; 5] = [
        IdentifierKind::Name,
        IdentifierKind::Tenant,
        IdentifierKind::Region,
        IdentifierKind::DimensionKey,
        IdentifierKind::DimensionValue,
    ];

    #[test]
    fn test_allowed_values_pass_unchanged() {
        for kind in ALL_KINDS {
            assert_eq!(validate(Some("abc"), kind).unwrap(), "abc");
            assert_eq!(validate(Some("web_01"), kind).unwrap(), "web_01");
        }

        assert_eq!(
            validate(Some("web-01_a.b"), IdentifierKind::DimensionValue).unwrap(),
            "web-01_a.b"
        );

        assert_eq!(
            validate(Some("http://host:8080/path"), IdentifierKind::DimensionValue).unwrap(),
            "http://host:8080/path"
        );
        assert_eq!(
            validate(Some("us-east-1"), IdentifierKind::Region).unwrap(),
            "us-east-1"
        );
    }

    #[test]
    fn test_disallowed_characters_rejected() {
        let hostile = [
            "a'b", "a;b", "a\"b", "a b", "a\nb", "a\0b", "a\\b", "a=b", "a(b)",
            "a*b", "a#b", "a`b", "café",
        ];

        for kind in ALL_KINDS {
            for value in hostile {
                let err = validate(Some(value), kind).unwrap_err();
                assert!(
                    matches!(err, FilterError::InvalidIdentifier { .. }),
                    "{:?} accepted as {}",
                    value,
                    kind
                );
            }
        }
    }

    #[test]
    fn test_dimension_keys_are_stricter() {
        assert!(validate(Some("a:b"), IdentifierKind::DimensionKey).is_err());
        assert!(validate(Some("a/b"), IdentifierKind::DimensionKey).is_err());
        assert!(validate(Some("a:b"), IdentifierKind::DimensionValue).is_ok());
        assert!(is_allowed_char('_', IdentifierKind::DimensionKey));
        assert!(!is_allowed_char('.', IdentifierKind::DimensionKey));
        assert!(!is_allowed_char('-', IdentifierKind::DimensionKey));
        assert!(!is_allowed_char(':', IdentifierKind::DimensionKey));
    }

    #[test]
    fn test_bare_key_shape() {
        assert!(validate(Some("service_name"), IdentifierKind::DimensionKey).is_ok());
        assert!(validate(Some("_internal"), IdentifierKind::DimensionKey).is_ok());
        assert!(validate(Some("host2"), IdentifierKind::DimensionKey).is_ok());

        assert_eq!(
            validate(Some("host-name"), IdentifierKind::DimensionKey),
            Err(FilterError::InvalidIdentifier {
                kind: IdentifierKind::DimensionKey,
                reason: Rejection::DisallowedCharacter {
                    character: '-',
                    position: 4,
                },
            })
        );

        for key in ["a-", "a.", "a.b", "a-1", "service-name", "1host", "-host", ".host"] {
            assert!(
                validate(Some(key), IdentifierKind::DimensionKey).is_err(),
                "{:?} accepted as a dimension key",
                key
            );
        }

        // Quoted kinds keep their looser shape
        assert!(validate(Some("1host"), IdentifierKind::DimensionValue).is_ok());
        assert!(validate(Some("a--b"), IdentifierKind::DimensionValue).is_ok());
        assert!(validate(Some("host-name"), IdentifierKind::DimensionValue).is_ok());
    }

    #[test]
    fn test_missing_and_empty() {
        assert_eq!(
            validate(None, IdentifierKind::Region),
            Err(FilterError::InvalidIdentifier {
                kind: IdentifierKind::Region,
                reason: Rejection::Missing,
            })
        );
        assert_eq!(
            validate(Some(""), IdentifierKind::Region),
            Err(FilterError::InvalidIdentifier {
                kind: IdentifierKind::Region,
                reason: Rejection::Empty,
            })
        );
    }

    #[test]
    fn test_rejection_reports_position() {
        let err = validate(Some("web1';drop"), IdentifierKind::DimensionValue).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidIdentifier {
                kind: IdentifierKind::DimensionValue,
                reason: Rejection::DisallowedCharacter {
                    character: '\'',
                    position: 4,
                },
            }
        );
    }

    #[test]
    fn test_length_limit() {
        let sanitizer = Sanitizer::new(ClauseLimits {
            max_identifier_length: 8,
            ..ClauseLimits::default()
        });

        assert!(sanitizer.is_valid("abcdefgh", IdentifierKind::Name));
        assert_eq!(
            sanitizer.validate(Some("abcdefghi"), IdentifierKind::Name),
            Err(FilterError::InvalidIdentifier {
                kind: IdentifierKind::Name,
                reason: Rejection::TooLong { length: 9, max: 8 },
            })
        );
    }

    #[test]
    fn test_validate_optional() {
        let sanitizer = Sanitizer::default();
        assert_eq!(sanitizer.validate_optional(None, IdentifierKind::Name), Ok(None));
        assert_eq!(sanitizer.validate_optional(Some(""), IdentifierKind::Name), Ok(None));
        assert_eq!(
            sanitizer.validate_optional(Some("cpu"), IdentifierKind::Name),
            Ok(Some("cpu"))
        );
        assert!(sanitizer
            .validate_optional(Some("cpu'"), IdentifierKind::Name)
            .is_err());
    }

    #[test]
    fn test_idempotent() {
        let first = validate(Some("cpu.idle"), IdentifierKind::Name).unwrap();
        let second = validate(Some(first), IdentifierKind::Name).unwrap();
        assert_eq!(first, second);

        let first = validate(Some("x;y"), IdentifierKind::Name).unwrap_err();
        let second = validate(Some("x;y"), IdentifierKind::Name).unwrap_err();
        assert_eq!(first, second);
    }

    #[test]
    fn test_identifier_carries_kind() {
        let id = Sanitizer::default()
            .identifier(Some("tenant-1"), IdentifierKind::Tenant)
            .unwrap();
        assert_eq!(id, "tenant-1");
        assert_eq!(id.kind(), IdentifierKind::Tenant);
    }
}
