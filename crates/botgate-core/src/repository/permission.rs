//! Capability lookup port.

use botgate_types::error::RepositoryError;
use botgate_types::identity::{Capability, CallerId};

/// Coarse capability check: may this caller perform this class of action?
pub trait CapabilityChecker: Send + Sync {
    fn has_capability(
        &self,
        caller: CallerId,
        capability: Capability,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
