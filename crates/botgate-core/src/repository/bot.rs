//! Bot repository trait definition.

use botgate_types::bot::{Bot, BotId, NewBot};
use botgate_types::error::RepositoryError;
use botgate_types::identity::CallerId;

use crate::query::QueryPlan;

/// One page of bots plus the size of the whole filtered set.
#[derive(Debug, Clone, Default)]
pub struct BotListing {
    pub bots: Vec<Bot>,
    /// Count over every row matching the filter, not just this page.
    pub total_records: i64,
}

/// Repository trait for bot persistence.
///
/// Implementations live in botgate-infra (e.g., SqliteBotRepository).
/// Every call is expected to be bounded by a storage timeout and to stop
/// work when its future is dropped.
pub trait BotRepository: Send + Sync {
    /// Insert a bot. The store assigns `id`, `created_at` and `active`.
    fn insert(
        &self,
        bot: &NewBot,
    ) -> impl std::future::Future<Output = Result<Bot, RepositoryError>> + Send;

    /// Fetch a bot. Ids below 1 are `NotFound` without touching storage.
    fn get(
        &self,
        id: BotId,
    ) -> impl std::future::Future<Output = Result<Bot, RepositoryError>> + Send;

    /// Fetch only the owner of a bot, for the ownership check.
    fn get_owner(
        &self,
        id: BotId,
    ) -> impl std::future::Future<Output = Result<CallerId, RepositoryError>> + Send;

    /// Run a validated listing plan, optionally restricted to one owner.
    fn list(
        &self,
        plan: &QueryPlan,
        owner: Option<CallerId>,
    ) -> impl std::future::Future<Output = Result<BotListing, RepositoryError>> + Send;

    /// Persist name, credential and confirmation state. A row that no longer
    /// exists yields `EditConflict`.
    fn update(
        &self,
        bot: &Bot,
    ) -> impl std::future::Future<Output = Result<Bot, RepositoryError>> + Send;

    /// Hard delete. Zero rows affected is `NotFound`.
    fn delete(
        &self,
        id: BotId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
