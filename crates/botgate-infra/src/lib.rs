//! Infrastructure layer for Botgate.
//!
//! Contains implementations of the ports defined in `botgate-core`: SQLite
//! storage for bots, capability grants and API keys, the HTTP credential
//! validator, and configuration loading.

pub mod config;
pub mod credential;
pub mod sqlite;
