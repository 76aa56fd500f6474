//! Shared domain types for Botgate.
//!
//! This crate contains the domain types used across the Botgate service:
//! Bot, caller identity and capabilities, listing metadata, field validation,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod bot;
pub mod config;
pub mod error;
pub mod identity;
pub mod listing;
pub mod validation;
