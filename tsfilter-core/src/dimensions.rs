//! Dimension key-value pairs used to narrow a metric filter

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{FilterError, FilterResult};

/// A set of raw dimension key-value pairs.
///
/// Keys are unique and iterate in lexicographic order, so clauses built from
/// the same set are byte-identical. Nothing here is sanitized; that happens
/// when a clause is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet {
    dims: BTreeMap<String, String>,
}

impl DimensionSet {
    /// Create a new empty dimension set
    pub fn new() -> Self {
        Self {
            dims: BTreeMap::new(),
        }
    }

    /// Parse the `key:value,key:value` form used by the metrics API query
    /// string. Whitespace around keys and values is trimmed and a later
    /// duplicate key replaces an earlier one.
    pub fn parse_query_param(s: &str) -> FilterResult<Self> {
        let mut dims = BTreeMap::new();

        if s.trim().is_empty() {
            return Ok(Self { dims });
        }

        for pair in s.split(',') {
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                FilterError::invalid_dimension(format!("Invalid dimension pair: {:?}", pair))
            })?;

            let key = key.trim();
            let value = value.trim();

            if key.is_empty() {
                return Err(FilterError::invalid_dimension(format!(
                    "Dimension pair has no key: {:?}",
                    pair
                )));
            }

            if value.is_empty() {
                return Err(FilterError::invalid_dimension(format!(
                    "Dimension {} has no value",
                    key
                )));
            }

            dims.insert(key.to_string(), value.to_string());
        }

        Ok(Self { dims })
    }

    /// Insert a dimension, returning the previous value for the key
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.dims.insert(key.into(), value.into())
    }

    /// Get a dimension value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.dims.get(key).map(String::as_str)
    }

    /// Check if a dimension key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.dims.contains_key(key)
    }

    /// Remove a dimension by key
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.dims.remove(key)
    }

    /// Get the number of dimensions
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Check if the dimension set is empty
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Iterate over pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dims.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get all dimension keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.dims.keys().map(String::as_str)
    }
}

impl From<HashMap<String, String>> for DimensionSet {
    fn from(map: HashMap<String, String>) -> Self {
        Self {
            dims: map.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for DimensionSet {
    fn from(dims: BTreeMap<String, String>) -> Self {
        Self { dims }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DimensionSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            dims: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for DimensionSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.dims
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl fmt::Display for DimensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
        write!(f, "{}", pairs.join(","))
    }
}
