//! Business logic and repository trait definitions for Botgate.
//!
//! This crate defines the "ports" (repository, capability and credential
//! traits) that the infrastructure layer implements, plus the access guards
//! and listing planner composed around them. It depends only on
//! `botgate-types` -- never on `botgate-infra` or any database/IO crate.

pub mod access;
pub mod credential;
pub mod query;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
