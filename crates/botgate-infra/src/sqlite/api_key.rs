//! SQLite API key store.
//!
//! Keys are never stored in plaintext; callers hand in the SHA-256 digest and
//! get back the identity the key was issued to.

use std::time::Duration;

use botgate_types::error::RepositoryError;
use botgate_types::identity::CallerId;

use super::bot::DEFAULT_TIMEOUT;
use super::pool::{DatabasePool, bounded};

/// Maps API key digests to caller identities.
pub struct SqliteApiKeyStore {
    pool: DatabasePool,
    timeout: Duration,
}

impl SqliteApiKeyStore {
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

    /// Record a new key digest for `user`. Returns the key record id.
    pub async fn insert(
        &self,
        user: CallerId,
        name: &str,
        key_hash: &str,
    ) -> Result<String, RepositoryError> {
        let id = uuid::Uuid::now_v7().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        bounded(
            self.timeout,
            sqlx::query(
                "INSERT INTO api_keys (id, key_hash, user_id, name, created_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(key_hash)
            .bind(user.0)
            .bind(name)
            .bind(&now)
            .execute(&self.pool.writer),
        )
        .await?;

        Ok(id)
    }

    /// Resolve a key digest to the identity it was issued to.
    ///
    /// Touches `last_used_at` on success; a failure to do so is logged and
    /// does not fail the lookup.
    pub async fn resolve(&self, key_hash: &str) -> Result<Option<CallerId>, RepositoryError> {
        let row: Option<(String, i64)> = bounded(
            self.timeout,
            sqlx::query_as("SELECT id, user_id FROM api_keys WHERE key_hash = ?")
                .bind(key_hash)
                .fetch_optional(&self.pool.reader),
        )
        .await?;

        let Some((id, user_id)) = row else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();
        if let Err(e) = bounded(
            self.timeout,
            sqlx::query("UPDATE api_keys SET last_used_at = ? WHERE id = ?")
                .bind(&now)
                .bind(&id)
                .execute(&self.pool.writer),
        )
        .await
        {
            tracing::debug!(key_id = %id, "failed to record key use: {e}");
        }

        Ok(Some(CallerId(user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;

    async fn test_store() -> SqliteApiKeyStore {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path(), "test.db");
        std::mem::forget(dir);
        SqliteApiKeyStore::new(DatabasePool::new(&url).await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_resolve() {
        let store = test_store().await;
        store.insert(CallerId(9), "laptop", "digest-a").await.unwrap();

        assert_eq!(store.resolve("digest-a").await.unwrap(), Some(CallerId(9)));
        assert_eq!(store.resolve("digest-b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_digest_rejected() {
        let store = test_store().await;
        store.insert(CallerId(1), "one", "same").await.unwrap();
        let err = store.insert(CallerId(2), "two", "same").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Query(_)));
    }
}
