//! Listing parameter validation and pagination math.
//!
//! Raw query-string values go in, a [`QueryPlan`] built only from closed
//! enums and checked integers comes out. Nothing the caller typed reaches the
//! storage layer as text except the normalized search lexemes, which are
//! bound as parameters.

use serde::Deserialize;

use botgate_types::config::ListingConfig;
use botgate_types::listing::Metadata;
use botgate_types::validation::{ValidationErrors, Validator};

use super::search::SearchTerm;
use crate::repository::SortOrder;

const MAX_PAGE: i64 = 10_000_000;

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    OwnerId,
    Name,
    Credential,
}

impl SortColumn {
    /// Accepted sort keys, without the optional `-` prefix.
    pub const SAFELIST: [&'static str; 4] = ["id", "owner_id", "name", "credential"];

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(SortColumn::Id),
            "owner_id" => Some(SortColumn::OwnerId),
            "name" => Some(SortColumn::Name),
            "credential" => Some(SortColumn::Credential),
            _ => None,
        }
    }
}

/// Untrusted listing parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Free-text search over bot names.
    #[serde(default, alias = "name")]
    pub search: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// Sort key, `-` prefix for descending.
    pub sort: Option<String>,
}

/// A validated, bounded listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub search: SearchTerm,
    pub page: i64,
    pub page_size: i64,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
}

impl QueryPlan {
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip. Saturates instead of overflowing for pages far past
    /// the end, which simply come back empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Turns raw listing parameters into a [`QueryPlan`] and computes response
/// metadata.
#[derive(Debug, Clone)]
pub struct QueryFilterEngine {
    default_page_size: i64,
    max_page_size: i64,
}

impl Default for QueryFilterEngine {
    fn default() -> Self {
        Self::new(&ListingConfig::default())
    }
}

impl QueryFilterEngine {
    pub fn new(config: &ListingConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Validate every parameter, collecting one message per bad field.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn plan(&self, params: &ListParams) -> Result<QueryPlan, ValidationErrors> {
        let mut v = Validator::new();

        let page = read_int(&mut v, "page", params.page.as_deref(), 1);
        let page_size = read_int(
            &mut v,
            "page_size",
            params.page_size.as_deref(),
            self.default_page_size,
        );

        v.check(page > 0, "page", "must be greater than zero");
        v.check(page <= MAX_PAGE, "page", "must be a maximum of 10 million");
        v.check(page_size > 0, "page_size", "must be greater than zero");
        v.check(
            page_size <= self.max_page_size,
            "page_size",
            format!("must be a maximum of {}", self.max_page_size),
        );

        let raw_sort = params.sort.as_deref().unwrap_or("id");
        let (key, sort_order) = match raw_sort.strip_prefix('-') {
            Some(rest) => (rest, SortOrder::Desc),
            None => (raw_sort, SortOrder::Asc),
        };
        let sort_column = SortColumn::from_key(key);
        v.check(sort_column.is_some(), "sort", "invalid sort value");

        v.finish()?;

        Ok(QueryPlan {
            search: SearchTerm::parse(params.search.as_deref().unwrap_or("")),
            page,
            page_size,
            sort_column: sort_column.unwrap_or(SortColumn::Id),
            sort_order,
        })
    }

    pub fn metadata(&self, total_records: i64, plan: &QueryPlan) -> Metadata {
        Metadata::calculate(total_records, plan.page, plan.page_size)
    }
}

fn read_int(v: &mut Validator, field: &str, raw: Option<&str>, default: i64) -> i64 {
    match raw {
        None | Some("") => default,
        Some(s) => match s.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                v.add_error(field, "must be an integer value");
                default
            }
        },
    }
}
