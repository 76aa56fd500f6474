//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (botgate-infra) implements. The core crate never depends on any
//! specific storage technology.

pub mod bot;
pub mod permission;

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}
