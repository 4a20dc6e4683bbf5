//! # tsfilter core library
//!
//! Builds InfluxQL filter clauses for multi-tenant metric queries from
//! untrusted input.
//!
//! ## Features
//!
//! - **Sanitization**: allowlist validation of every string before it is
//!   interpolated; nothing is escaped or silently stripped
//! - **Clause fragments**: self-delimiting pieces (tenant, region,
//!   dimensions, time bounds) that compose by plain concatenation
//! - **Statements**: series listing, metric name listing, measurement
//!   listing and statistics queries built from a [`MetricFilter`]
//! - **Limits**: identifier length, dimension count and row limits, loaded
//!   from the environment
//!
//! All operations are pure and synchronous, and every public type is
//! `Send + Sync`.

pub mod clause;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod identifier;
pub mod query;
pub mod sanitize;
pub mod time;

// Re-export commonly used types
pub use clause::{ClauseBuilder, ClauseFragment};
pub use config::ClauseLimits;
pub use dimensions::DimensionSet;
pub use error::{FilterError, FilterResult, Rejection};
pub use identifier::{Identifier, IdentifierKind};
pub use query::{parse_merge_metrics, MetricFilter, Page, StatementBuilder, Statistic};
pub use sanitize::Sanitizer;
pub use time::TimeBounds;

/// Version information for tsfilter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum length for identifiers, in bytes
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum number of dimensions in one filter
pub const MAX_DIMENSIONS: usize = 50;

/// Default statistics period in seconds
pub const DEFAULT_PERIOD_SECS: u64 = 300;

/// Maximum row limit for a single statement
pub const MAX_LIMIT: usize = 10_000;
