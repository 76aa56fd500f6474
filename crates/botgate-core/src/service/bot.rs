//! Bot management service.
//!
//! Every operation is admitted through the [`GuardChain`] before it touches
//! a bot: the capability check first, then (for single-bot operations) the
//! ownership check. Creation additionally confirms the credential with the
//! external platform before anything is stored.

use serde::Serialize;

use botgate_types::bot::{Bot, BotId, CreateBotRequest, NewBot, UpdateBotRequest};
use botgate_types::error::{BotError, RepositoryError, TokenCheckError};
use botgate_types::identity::{Capability, CallerId};
use botgate_types::listing::Metadata;
use botgate_types::validation::{self, Validator};

use crate::access::{GuardChain, Rejection};
use crate::credential::TokenValidator;
use crate::query::{ListParams, QueryFilterEngine};
use crate::repository::bot::BotRepository;
use crate::repository::permission::CapabilityChecker;

/// A page of bots with its pagination summary.
#[derive(Debug, Clone, Serialize)]
pub struct BotPage {
    pub bots: Vec<Bot>,
    pub metadata: Metadata,
}

/// Service orchestrating the bot lifecycle.
///
/// Generic over repository and collaborator traits to maintain clean
/// architecture -- botgate-core never depends on botgate-infra.
pub struct BotService<B: BotRepository, C: CapabilityChecker, T: TokenValidator> {
    bot_repo: B,
    capabilities: C,
    tokens: T,
    filters: QueryFilterEngine,
    conceal_foreign_bots: bool,
}

impl<B: BotRepository, C: CapabilityChecker, T: TokenValidator> BotService<B, C, T> {
    pub fn new(bot_repo: B, capabilities: C, tokens: T, filters: QueryFilterEngine) -> Self {
        Self {
            bot_repo,
            capabilities,
            tokens,
            filters,
            conceal_foreign_bots: false,
        }
    }

    /// Report bots owned by other callers as missing rather than forbidden.
    pub fn with_concealed_foreign_bots(mut self, conceal: bool) -> Self {
        self.conceal_foreign_bots = conceal;
        self
    }

    async fn admit(
        &self,
        caller: CallerId,
        capability: Capability,
        target: Option<BotId>,
    ) -> Result<(), BotError> {
        GuardChain::new(&self.capabilities, &self.bot_repo)
            .admit(caller, capability, target)
            .await
            .map_err(|rejection| {
                let step = rejection.step();
                if let Rejection::Storage { source, .. } = &rejection {
                    tracing::error!(
                        %caller,
                        bot_id = ?target.map(|id| id.0),
                        ?step,
                        error = %source,
                        "access check failed"
                    );
                } else {
                    tracing::debug!(%caller, %capability, ?step, "request not admitted");
                }
                rejection.into_bot_error(self.conceal_foreign_bots)
            })
    }

    /// Create a bot owned by `caller`.
    ///
    /// Fields are validated first, then the credential is confirmed. If the
    /// confirmation service gives no answer, creation fails; the bot is never
    /// stored as unconfirmed on a check that did not run.
    pub async fn create_bot(
        &self,
        caller: CallerId,
        request: CreateBotRequest,
    ) -> Result<Bot, BotError> {
        self.admit(caller, Capability::BotsWrite, None).await?;

        let mut v = Validator::new();
        validation::validate_create_request(&mut v, &request);
        v.finish()?;

        let confirmed = self.confirm("create", &request.credential).await?;

        let new_bot = NewBot {
            owner_id: caller,
            name: request.name,
            credential: request.credential,
            credential_confirmed: confirmed,
        };

        let bot = self
            .bot_repo
            .insert(&new_bot)
            .await
            .map_err(|e| storage_failure("insert", None, e))?;

        tracing::debug!(bot_id = %bot.id, owner_id = %caller, confirmed, "bot created");
        Ok(bot)
    }

    pub async fn get_bot(&self, caller: CallerId, id: BotId) -> Result<Bot, BotError> {
        self.admit(caller, Capability::BotsRead, Some(id)).await?;

        self.bot_repo
            .get(id)
            .await
            .map_err(|e| storage_failure("get", Some(id), e))
    }

    /// Apply a partial update. Only name and credential change; a changed
    /// credential is confirmed again.
    pub async fn update_bot(
        &self,
        caller: CallerId,
        id: BotId,
        request: UpdateBotRequest,
    ) -> Result<Bot, BotError> {
        self.admit(caller, Capability::BotsWrite, Some(id)).await?;

        let mut bot = self
            .bot_repo
            .get(id)
            .await
            .map_err(|e| storage_failure("get", Some(id), e))?;

        if let Some(name) = request.name {
            bot.name = name;
        }

        let credential_changed = match request.credential {
            Some(credential) if credential != bot.credential => {
                bot.credential = credential;
                true
            }
            _ => false,
        };

        let mut v = Validator::new();
        validation::validate_bot_fields(&mut v, &bot.name, &bot.credential);
        v.finish()?;

        if credential_changed {
            bot.credential_confirmed = self.confirm("update", &bot.credential).await?;
        }

        self.bot_repo
            .update(&bot)
            .await
            .map_err(|e| storage_failure("update", Some(id), e))
    }

    pub async fn delete_bot(&self, caller: CallerId, id: BotId) -> Result<(), BotError> {
        self.admit(caller, Capability::BotsWrite, Some(id)).await?;

        self.bot_repo
            .delete(id)
            .await
            .map_err(|e| storage_failure("delete", Some(id), e))?;

        tracing::debug!(bot_id = %id, "bot deleted");
        Ok(())
    }

    /// List the caller's own bots.
    pub async fn list_own_bots(
        &self,
        caller: CallerId,
        params: &ListParams,
    ) -> Result<BotPage, BotError> {
        self.admit(caller, Capability::BotsRead, None).await?;
        self.list(params, Some(caller)).await
    }

    /// List every bot. Capability check only, no ownership scoping.
    pub async fn list_all_bots(
        &self,
        caller: CallerId,
        params: &ListParams,
    ) -> Result<BotPage, BotError> {
        self.admit(caller, Capability::BotsAdmin, None).await?;
        self.list(params, None).await
    }

    async fn list(&self, params: &ListParams, owner: Option<CallerId>) -> Result<BotPage, BotError> {
        let plan = self.filters.plan(params)?;

        let listing = self
            .bot_repo
            .list(&plan, owner)
            .await
            .map_err(|e| storage_failure("list", None, e))?;

        Ok(BotPage {
            metadata: self.filters.metadata(listing.total_records, &plan),
            bots: listing.bots,
        })
    }

    /// Confirm a credential without storing anything.
    pub async fn check_credential(
        &self,
        caller: CallerId,
        credential: &str,
    ) -> Result<bool, BotError> {
        self.admit(caller, Capability::BotsWrite, None).await?;

        let mut v = Validator::new();
        v.check(!credential.is_empty(), "credential", "must be provided");
        v.finish()?;

        self.confirm("check", credential).await
    }

    async fn confirm(&self, operation: &str, credential: &str) -> Result<bool, BotError> {
        self.tokens.confirm(credential).await.map_err(|e: TokenCheckError| {
            tracing::error!(operation, error = %e, "credential confirmation did not complete");
            BotError::from(e)
        })
    }
}

/// Log storage faults with context; pass every other outcome through.
fn storage_failure(operation: &str, bot_id: Option<BotId>, e: RepositoryError) -> BotError {
    let err = BotError::from(e);
    if let BotError::Storage(detail) = &err {
        tracing::error!(operation, bot_id = ?bot_id.map(|id| id.0), error = %detail, "storage failure");
    }
    err
}
