//! Listing query planning: sort safelist, pagination and search terms.

pub mod filters;
pub mod search;

pub use filters::{ListParams, QueryFilterEngine, QueryPlan, SortColumn};
pub use search::SearchTerm;
