//! Bot credential confirmation against the external platform.

pub mod http;
