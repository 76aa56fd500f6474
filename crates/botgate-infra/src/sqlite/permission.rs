//! SQLite capability store.
//!
//! Grants live in `user_permissions`, one row per (user, capability) pair.

use std::time::Duration;

use botgate_core::repository::permission::CapabilityChecker;
use botgate_types::error::RepositoryError;
use botgate_types::identity::{CallerId, Capability};

use super::bot::DEFAULT_TIMEOUT;
use super::pool::{DatabasePool, bounded};

/// SQLite-backed implementation of `CapabilityChecker`, plus grant management.
pub struct SqliteCapabilityStore {
    pool: DatabasePool,
    timeout: Duration,
}

impl SqliteCapabilityStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Grant a capability. Returns `false` if the caller already held it.
    pub async fn grant(
        &self,
        caller: CallerId,
        capability: Capability,
    ) -> Result<bool, RepositoryError> {
        let result = bounded(
            self.timeout,
            sqlx::query("INSERT OR IGNORE INTO user_permissions (user_id, capability) VALUES (?, ?)")
                .bind(caller.0)
                .bind(capability.as_str())
                .execute(&self.pool.writer),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke a capability. Returns `false` if the caller did not hold it.
    pub async fn revoke(
        &self,
        caller: CallerId,
        capability: Capability,
    ) -> Result<bool, RepositoryError> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM user_permissions WHERE user_id = ? AND capability = ?")
                .bind(caller.0)
                .bind(capability.as_str())
                .execute(&self.pool.writer),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self, caller: CallerId) -> Result<Vec<Capability>, RepositoryError> {
        let rows: Vec<(String,)> = bounded(
            self.timeout,
            sqlx::query_as(
                "SELECT capability FROM user_permissions WHERE user_id = ? ORDER BY capability",
            )
            .bind(caller.0)
            .fetch_all(&self.pool.reader),
        )
        .await?;

        rows.into_iter()
            .map(|(name,)| name.parse::<Capability>().map_err(RepositoryError::Query))
            .collect()
    }
}

impl CapabilityChecker for SqliteCapabilityStore {
    async fn has_capability(
        &self,
        caller: CallerId,
        capability: Capability,
    ) -> Result<bool, RepositoryError> {
        let row: Option<(i64,)> = bounded(
            self.timeout,
            sqlx::query_as("SELECT 1 FROM user_permissions WHERE user_id = ? AND capability = ?")
                .bind(caller.0)
                .bind(capability.as_str())
                .fetch_optional(&self.pool.reader),
        )
        .await?;

        Ok(row.is_some())
    }
}
