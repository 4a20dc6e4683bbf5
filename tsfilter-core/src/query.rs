//! Query statements assembled from clause fragments

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::clause::{ClauseBuilder, ClauseFragment};
use crate::config::ClauseLimits;
use crate::dimensions::DimensionSet;
use crate::error::{FilterError, FilterResult};
use crate::identifier::IdentifierKind;
use crate::time::TimeBounds;

/// Everything that narrows a metric query, as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricFilter {
    /// Tenant the query is scoped to
    pub tenant_id: Option<String>,

    /// Region the query is scoped to
    pub region: String,

    /// Metric name (optional for series listing)
    #[serde(default)]
    pub name: Option<String>,

    /// Dimensions all results must match
    #[serde(default)]
    pub dimensions: DimensionSet,

    /// Exclusive time bounds
    #[serde(default)]
    pub bounds: TimeBounds,
}

impl MetricFilter {
    /// Create a filter for a tenant in a region
    pub fn new<T: Into<String>, R: Into<String>>(tenant_id: T, region: R) -> Self {
        Self {
            tenant_id: Some(tenant_id.into()),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Set the metric name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the dimensions
    pub fn with_dimensions(mut self, dimensions: DimensionSet) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the time bounds
    pub fn with_bounds(mut self, bounds: TimeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// The `from "<name>"` fragment, empty without a name
    pub fn source(&self, clauses: &ClauseBuilder) -> FilterResult<ClauseFragment> {
        clauses.source_part(self.name.as_deref())
    }

    /// The predicate following `where`: tenant, region, dimensions, then
    /// lower and upper time bounds
    pub fn predicate(&self, clauses: &ClauseBuilder) -> FilterResult<ClauseFragment> {
        Ok(clauses.tenant_part(self.tenant_id.as_deref())?
            + clauses.region_part(&self.region)?
            + clauses.dimensions_part(Some(&self.dimensions))?
            + clauses.lower_time_bound_part(self.bounds.start.as_ref())
            + clauses.upper_time_bound_part(self.bounds.end.as_ref()))
    }
}

/// Summary statistic computed over a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Avg,
    Min,
    Max,
    Count,
    Sum,
}

impl Statistic {
    /// The InfluxQL function computing this statistic
    pub fn function_name(&self) -> &'static str {
        match self {
            Statistic::Avg => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Count => "count",
            Statistic::Sum => "sum",
        }
    }

    /// Parse the comma separated `statistics` query parameter
    pub fn parse_list(s: &str) -> FilterResult<Vec<Statistic>> {
        s.split(',').map(|part| part.trim().parse()).collect()
    }
}

impl FromStr for Statistic {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avg" => Ok(Statistic::Avg),
            "min" => Ok(Statistic::Min),
            "max" => Ok(Statistic::Max),
            "count" => Ok(Statistic::Count),
            "sum" => Ok(Statistic::Sum),
            _ => Err(FilterError::invalid_statistic(format!(
                "Unknown statistic: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Statistic::Avg => "avg",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Count => "count",
            Statistic::Sum => "sum",
        };
        write!(f, "{}", s)
    }
}

/// Row limit and offset appended to a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl Page {
    /// A page of at most `limit` rows
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Skip the first `offset` rows
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Parse the `merge_metrics` query parameter.
///
/// Absent means `false`. Otherwise only `true` or `false` (in any case) are
/// accepted; anything else, including the empty string, is an error.
pub fn parse_merge_metrics(value: Option<&str>) -> FilterResult<bool> {
    match value {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(v) => Err(FilterError::invalid_flag("merge_metrics", v)),
    }
}

/// Builds the statements the metrics API issues: series listing, metric
/// name listing, measurement listing and statistics.
///
/// Measurement and statistics queries take a `merge_metrics` flag. When it
/// is false every matching series is kept apart with `group by *`; when true
/// all matching series are merged into one result.
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    clauses: ClauseBuilder,
}

impl StatementBuilder {
    /// Create a statement builder enforcing custom limits
    pub fn new(limits: ClauseLimits) -> Self {
        Self {
            clauses: ClauseBuilder::new(limits),
        }
    }

    /// The clause builder used for fragments
    pub fn clauses(&self) -> &ClauseBuilder {
        &self.clauses
    }

    /// `show series[ from "<name>"] where <predicate>`
    pub fn list_series(&self, filter: &MetricFilter, page: Page) -> FilterResult<String> {
        let source = filter.source(&self.clauses)?;
        let predicate = filter.predicate(&self.clauses)?;

        let mut statement = String::from("show series");
        if !source.is_empty() {
            statement.push(' ');
            statement.push_str(source.as_str());
        }
        statement.push_str(" where ");
        statement.push_str(predicate.as_str());
        self.push_page(&mut statement, page)?;

        trace!(%statement, "built series statement");
        Ok(statement)
    }

    /// `show measurements where <predicate>`. Any name on the filter is
    /// ignored.
    pub fn metric_names(&self, filter: &MetricFilter, page: Page) -> FilterResult<String> {
        let predicate = filter.predicate(&self.clauses)?;

        let mut statement = format!("show measurements where {}", predicate);
        self.push_page(&mut statement, page)?;

        trace!(%statement, "built metric names statement");
        Ok(statement)
    }

    /// `select value from "<name>" where <predicate>[ group by *]`. A name
    /// is required.
    pub fn measurements(
        &self,
        filter: &MetricFilter,
        merge_metrics: bool,
        page: Page,
    ) -> FilterResult<String> {
        let source = self.required_source(filter)?;
        let predicate = filter.predicate(&self.clauses)?;

        let mut statement = format!("select value {} where {}", source, predicate);
        if !merge_metrics {
            statement.push_str(" group by *");
        }
        self.push_page(&mut statement, page)?;

        trace!(%statement, "built measurements statement");
        Ok(statement)
    }

    /// `select <fn>(value),... from "<name>" where <predicate> group by time(<period>s)[, *]`.
    ///
    /// Repeated statistics are emitted once, in first-seen order. Without a
    /// period the configured default is used.
    pub fn statistics(
        &self,
        filter: &MetricFilter,
        statistics: &[Statistic],
        period_secs: Option<u64>,
        merge_metrics: bool,
        page: Page,
    ) -> FilterResult<String> {
        if statistics.is_empty() {
            return Err(FilterError::invalid_statistic(
                "At least one statistic is required",
            ));
        }

        let period = period_secs.unwrap_or(self.clauses.sanitizer().limits().default_period_secs);
        if period == 0 {
            return Err(FilterError::InvalidPeriod(period));
        }

        let source = self.required_source(filter)?;
        let predicate = filter.predicate(&self.clauses)?;

        let mut seen: Vec<Statistic> = Vec::with_capacity(statistics.len());
        for stat in statistics {
            if !seen.contains(stat) {
                seen.push(*stat);
            }
        }
        let columns: Vec<String> = seen
            .iter()
            .map(|s| format!("{}(value)", s.function_name()))
            .collect();

        let mut statement = format!(
            "select {} {} where {} group by time({}s)",
            columns.join(","),
            source,
            predicate,
            period
        );
        if !merge_metrics {
            statement.push_str(", *");
        }
        self.push_page(&mut statement, page)?;

        trace!(%statement, "built statistics statement");
        Ok(statement)
    }

    fn required_source(&self, filter: &MetricFilter) -> FilterResult<ClauseFragment> {
        self.clauses
            .sanitizer()
            .validate(filter.name.as_deref(), IdentifierKind::Name)?;
        filter.source(&self.clauses)
    }

    fn push_page(&self, statement: &mut String, page: Page) -> FilterResult<()> {
        if let Some(limit) = page.limit {
            if limit == 0 || limit > self.clauses.sanitizer().limits().max_limit {
                return Err(FilterError::InvalidLimit(limit));
            }
            statement.push_str(&format!(" limit {}", limit));
        }

        if let Some(offset) = page.offset {
            statement.push_str(&format!(" offset {}", offset));
        }

        Ok(())
    }
}
