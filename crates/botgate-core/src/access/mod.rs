//! Access control: capability checks layered over per-bot ownership.

pub mod chain;
pub mod guard;

pub use chain::{GuardChain, GuardStep, Rejection};
pub use guard::{Authorization, AuthorizationGuard};
