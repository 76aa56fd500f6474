//! Ordered guard chain: capability first, then ownership.
//!
//! Every bot operation is admitted through [`GuardChain::admit`]. The
//! capability check always runs first; the ownership check runs only when
//! the operation targets a single bot and the capability check passed. A
//! rejection short-circuits the operation before any bot body is read or
//! any row is written.

use botgate_types::bot::BotId;
use botgate_types::error::{BotError, RepositoryError};
use botgate_types::identity::{Capability, CallerId};

use super::guard::{Authorization, AuthorizationGuard};
use crate::repository::bot::BotRepository;
use crate::repository::permission::CapabilityChecker;

/// Which link of the chain rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStep {
    Capability,
    Ownership,
}

/// Why a request was not admitted.
#[derive(Debug)]
pub enum Rejection {
    MissingCapability(Capability),
    NotOwner,
    NotFound,
    Storage {
        step: GuardStep,
        source: RepositoryError,
    },
}

impl Rejection {
    pub fn step(&self) -> GuardStep {
        match self {
            Rejection::MissingCapability(_) => GuardStep::Capability,
            Rejection::NotOwner | Rejection::NotFound => GuardStep::Ownership,
            Rejection::Storage { step, .. } => *step,
        }
    }

    /// Map to the public error taxonomy. With `conceal_foreign` set, a bot
    /// owned by someone else is reported exactly like a missing one.
    pub fn into_bot_error(self, conceal_foreign: bool) -> BotError {
        match self {
            Rejection::MissingCapability(_) => BotError::Denied,
            Rejection::NotOwner if conceal_foreign => BotError::NotFound,
            Rejection::NotOwner => BotError::Denied,
            Rejection::NotFound => BotError::NotFound,
            Rejection::Storage { source, .. } => BotError::Storage(source.to_string()),
        }
    }
}

pub struct GuardChain<'a, C: CapabilityChecker, B: BotRepository> {
    capabilities: &'a C,
    ownership: AuthorizationGuard<'a, B>,
}

impl<'a, C: CapabilityChecker, B: BotRepository> GuardChain<'a, C, B> {
    pub fn new(capabilities: &'a C, bots: &'a B) -> Self {
        Self {
            capabilities,
            ownership: AuthorizationGuard::new(bots),
        }
    }

    pub async fn admit(
        &self,
        caller: CallerId,
        capability: Capability,
        target: Option<BotId>,
    ) -> Result<(), Rejection> {
        let granted = self
            .capabilities
            .has_capability(caller, capability)
            .await
            .map_err(|source| Rejection::Storage {
                step: GuardStep::Capability,
                source,
            })?;

        if !granted {
            tracing::warn!(%caller, %capability, "capability check rejected request");
            return Err(Rejection::MissingCapability(capability));
        }

        let Some(bot_id) = target else {
            return Ok(());
        };

        let outcome = self
            .ownership
            .authorize(caller, bot_id)
            .await
            .map_err(|source| Rejection::Storage {
                step: GuardStep::Ownership,
                source,
            })?;

        match outcome {
            Authorization::Allowed => Ok(()),
            Authorization::NotFound => Err(Rejection::NotFound),
            Authorization::Denied => {
                tracing::warn!(%caller, %bot_id, "ownership check rejected request");
                Err(Rejection::NotOwner)
            }
        }
    }
}
