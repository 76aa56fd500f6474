//! Logging and trace export setup for Botgate binaries.

pub mod tracing_setup;
