//! Filter clause fragments
//!
//! Each builder returns a self-delimiting [`ClauseFragment`]: every fragment
//! after the tenant anchor carries its own leading ` and `, and optional
//! inputs produce an empty fragment. A full predicate is the plain
//! concatenation, in order, of
//!
//! tenant, region, dimensions, lower time bound, upper time bound
//!
//! with the source (`from "<name>"`) placed before the `where` keyword.
//!
//! ```
//! use tsfilter_core::clause;
//!
//! let predicate = format!(
//!     "{}{}{}",
//!     clause::tenant_part(Some("abc")).unwrap(),
//!     clause::region_part("us-east-1").unwrap(),
//!     clause::dimensions_part(None).unwrap(),
//! );
//! assert_eq!(predicate, "tenant_id='abc' and region='us-east-1'");
//! ```

use chrono::{DateTime, TimeZone};
use std::fmt;
use std::ops::Add;

use crate::config::ClauseLimits;
use crate::dimensions::DimensionSet;
use crate::error::{FilterError, FilterResult};
use crate::identifier::IdentifierKind;
use crate::sanitize::Sanitizer;
use crate::time::format_timestamp;

/// One piece of a filter predicate.
///
/// Only the builders in this module create non-empty fragments, so a
/// fragment never contains unsanitized input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClauseFragment(String);

impl ClauseFragment {
    /// The empty fragment, emitted for absent optional inputs
    pub fn empty() -> Self {
        Self(String::new())
    }

    fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if the fragment contributes nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consume the fragment, returning the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ClauseFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClauseFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ClauseFragment {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ClauseFragment {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Add for ClauseFragment {
    type Output = ClauseFragment;

    fn add(mut self, rhs: ClauseFragment) -> ClauseFragment {
        self.0.push_str(&rhs.0);
        self
    }
}

impl Add<&ClauseFragment> for ClauseFragment {
    type Output = ClauseFragment;

    fn add(mut self, rhs: &ClauseFragment) -> ClauseFragment {
        self.0.push_str(&rhs.0);
        self
    }
}

/// Builds clause fragments with a configured [`Sanitizer`].
///
/// The free functions in this module use `ClauseBuilder::default()`.
#[derive(Debug, Clone, Default)]
pub struct ClauseBuilder {
    sanitizer: Sanitizer,
}

impl ClauseBuilder {
    /// Create a builder enforcing custom limits
    pub fn new(limits: ClauseLimits) -> Self {
        Self {
            sanitizer: Sanitizer::new(limits),
        }
    }

    /// The sanitizer used for every string input
    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// `from "<name>"`, or empty when no name is given
    pub fn source_part(&self, name: Option<&str>) -> FilterResult<ClauseFragment> {
        match self.sanitizer.validate_optional(name, IdentifierKind::Name)? {
            Some(name) => Ok(ClauseFragment::new(format!("from \"{}\"", name))),
            None => Ok(ClauseFragment::empty()),
        }
    }

    /// `tenant_id='<tenant>'`, the anchor of every predicate
    pub fn tenant_part(&self, tenant_id: Option<&str>) -> FilterResult<ClauseFragment> {
        let tenant_id = match tenant_id {
            None | Some("") => return Err(FilterError::MissingTenant),
            Some(t) => t,
        };

        let tenant = self
            .sanitizer
            .identifier(Some(tenant_id), IdentifierKind::Tenant)?;
        Ok(ClauseFragment::new(format!("tenant_id='{}'", tenant)))
    }

    /// ` and region='<region>'`
    pub fn region_part(&self, region: &str) -> FilterResult<ClauseFragment> {
        let region = self
            .sanitizer
            .identifier(Some(region), IdentifierKind::Region)?;
        Ok(ClauseFragment::new(format!(" and region='{}'", region)))
    }

    /// ` and <key>='<value>'` for every dimension, in key order
    pub fn dimensions_part(&self, dimensions: Option<&DimensionSet>) -> FilterResult<ClauseFragment> {
        let dimensions = match dimensions {
            Some(d) if !d.is_empty() => d,
            _ => return Ok(ClauseFragment::empty()),
        };

        let max = self.sanitizer.limits().max_dimensions;
        if dimensions.len() > max {
            return Err(FilterError::invalid_dimension(format!(
                "Too many dimensions: {} > {}",
                dimensions.len(),
                max
            )));
        }

        let mut s = String::new();
        for (key, value) in dimensions.iter() {
            let key = self
                .sanitizer
                .validate(Some(key), IdentifierKind::DimensionKey)?;
            let value = self
                .sanitizer
                .validate(Some(value), IdentifierKind::DimensionValue)?;
            s.push_str(&format!(" and {}='{}'", key, value));
        }

        Ok(ClauseFragment::new(s))
    }

    /// ` and time > '<timestamp>'`, or empty when there is no start
    pub fn lower_time_bound_part<Tz: TimeZone>(&self, start: Option<&DateTime<Tz>>) -> ClauseFragment
    where
        Tz::Offset: fmt::Display,
    {
        time_bound(">", start)
    }

    /// ` and time < '<timestamp>'`, or empty when there is no end
    pub fn upper_time_bound_part<Tz: TimeZone>(&self, end: Option<&DateTime<Tz>>) -> ClauseFragment
    where
        Tz::Offset: fmt::Display,
    {
        time_bound("<", end)
    }
}

fn time_bound<Tz: TimeZone>(op: &str, ts: Option<&DateTime<Tz>>) -> ClauseFragment
where
    Tz::Offset: fmt::Display,
{
    match ts {
        Some(ts) => ClauseFragment::new(format!(" and time {} '{}'", op, format_timestamp(ts))),
        None => ClauseFragment::empty(),
    }
}

/// See [`ClauseBuilder::source_part`]
pub fn source_part(name: Option<&str>) -> FilterResult<ClauseFragment> {
    ClauseBuilder::default().source_part(name)
}

/// See [`ClauseBuilder::tenant_part`]
pub fn tenant_part(tenant_id: Option<&str>) -> FilterResult<ClauseFragment> {
    ClauseBuilder::default().tenant_part(tenant_id)
}

/// See [`ClauseBuilder::region_part`]
pub fn region_part(region: &str) -> FilterResult<ClauseFragment> {
    ClauseBuilder::default().region_part(region)
}

/// See [`ClauseBuilder::dimensions_part`]
pub fn dimensions_part(dimensions: Option<&DimensionSet>) -> FilterResult<ClauseFragment> {
    ClauseBuilder::default().dimensions_part(dimensions)
}

/// See [`ClauseBuilder::lower_time_bound_part`]
pub fn lower_time_bound_part<Tz: TimeZone>(start: Option<&DateTime<Tz>>) -> ClauseFragment
where
    Tz::Offset: fmt::Display,
{
    time_bound(">", start)
}

/// See [`ClauseBuilder::upper_time_bound_part`]
pub fn upper_time_bound_part<Tz: TimeZone>(end: Option<&DateTime<Tz>>) -> ClauseFragment
where
    Tz::Offset: fmt::Display,
{
    time_bound("<", end)
}
