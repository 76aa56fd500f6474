//! SQLite bot repository implementation.
//!
//! Implements `BotRepository` from `botgate-core` using sqlx with split read/write pools.
//! Every statement is bounded by the repository timeout.
//!
//! Listing SQL is never assembled from request data: each (column, direction)
//! pair selects one of a fixed set of complete statements, and the search
//! expression and owner filter are bound parameters.

use std::time::Duration;

use botgate_core::query::{QueryPlan, SortColumn};
use botgate_core::repository::SortOrder;
use botgate_core::repository::bot::{BotListing, BotRepository};
use botgate_types::bot::{Bot, BotId, NewBot};
use botgate_types::error::RepositoryError;
use botgate_types::identity::CallerId;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::{DatabasePool, bounded};

/// Default bound for a single storage call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

const BOT_COLUMNS: &str =
    "id, owner_id, created_at, name, credential, credential_confirmed, active";

/// SQLite-backed implementation of `BotRepository`.
pub struct SqliteBotRepository {
    pool: DatabasePool,
    timeout: Duration,
}

impl SqliteBotRepository {
    /// Create a new repository backed by the given database pool.
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
}

/// Internal row type for mapping SQLite rows to domain Bot.
struct BotRow {
    id: i64,
    owner_id: i64,
    created_at: String,
    name: String,
    credential: String,
    credential_confirmed: bool,
    active: bool,
}

impl BotRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            created_at: row.try_get("created_at")?,
            name: row.try_get("name")?,
            credential: row.try_get("credential")?,
            credential_confirmed: row.try_get("credential_confirmed")?,
            active: row.try_get("active")?,
        })
    }

    fn into_bot(self) -> Result<Bot, RepositoryError> {
        Ok(Bot {
            id: BotId(self.id),
            owner_id: CallerId(self.owner_id),
            created_at: parse_datetime(&self.created_at)?,
            name: self.name,
            credential: self.credential,
            credential_confirmed: self.credential_confirmed,
            active: self.active,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn decode(row: &sqlx::sqlite::SqliteRow) -> Result<Bot, RepositoryError> {
    BotRow::from_row(row)
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .into_bot()
}

macro_rules! list_statement {
    ($order:literal) => {
        concat!(
            "SELECT COUNT(*) OVER() AS total_records, ",
            "b.id, b.owner_id, b.created_at, b.name, b.credential, b.credential_confirmed, b.active ",
            "FROM bots b ",
            "WHERE (?1 IS NULL OR b.id IN (SELECT rowid FROM bots_fts WHERE bots_fts MATCH ?1)) ",
            "AND (?2 IS NULL OR b.owner_id = ?2) ",
            "ORDER BY ",
            $order,
            ", b.id ASC ",
            "LIMIT ?3 OFFSET ?4"
        )
    };
}

/// The complete listing statement for a sort column and direction.
fn list_statement(column: SortColumn, order: SortOrder) -> &'static str {
    match (column, order) {
        (SortColumn::Id, SortOrder::Asc) => list_statement!("b.id ASC"),
        (SortColumn::Id, SortOrder::Desc) => list_statement!("b.id DESC"),
        (SortColumn::OwnerId, SortOrder::Asc) => list_statement!("b.owner_id ASC"),
        (SortColumn::OwnerId, SortOrder::Desc) => list_statement!("b.owner_id DESC"),
        (SortColumn::Name, SortOrder::Asc) => list_statement!("b.name ASC"),
        (SortColumn::Name, SortOrder::Desc) => list_statement!("b.name DESC"),
        (SortColumn::Credential, SortOrder::Asc) => list_statement!("b.credential ASC"),
        (SortColumn::Credential, SortOrder::Desc) => list_statement!("b.credential DESC"),
    }
}

impl BotRepository for SqliteBotRepository {
    async fn insert(&self, bot: &NewBot) -> Result<Bot, RepositoryError> {
        let sql = format!(
            "INSERT INTO bots (owner_id, name, credential, credential_confirmed)
             VALUES (?, ?, ?, ?)
             RETURNING {BOT_COLUMNS}"
        );
        let row = bounded(
            self.timeout,
            sqlx::query(&sql)
                .bind(bot.owner_id.0)
                .bind(&bot.name)
                .bind(&bot.credential)
                .bind(bot.credential_confirmed)
                .fetch_one(&self.pool.writer),
        )
        .await?;

        decode(&row)
    }

    async fn get(&self, id: BotId) -> Result<Bot, RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }

        let sql = format!("SELECT {BOT_COLUMNS} FROM bots WHERE id = ?");
        let row = bounded(
            self.timeout,
            sqlx::query(&sql).bind(id.0).fetch_optional(&self.pool.reader),
        )
        .await?;

        match row {
            Some(row) => decode(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn get_owner(&self, id: BotId) -> Result<CallerId, RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }

        let owner: Option<(i64,)> = bounded(
            self.timeout,
            sqlx::query_as("SELECT owner_id FROM bots WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool.reader),
        )
        .await?;

        owner
            .map(|(owner_id,)| CallerId(owner_id))
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(
        &self,
        plan: &QueryPlan,
        owner: Option<CallerId>,
    ) -> Result<BotListing, RepositoryError> {
        if !plan.search.is_satisfiable() {
            return Ok(BotListing::default());
        }

        let rows = bounded(
            self.timeout,
            sqlx::query(list_statement(plan.sort_column, plan.sort_order))
                .bind(plan.search.match_expression())
                .bind(owner.map(|o| o.0))
                .bind(plan.limit())
                .bind(plan.offset())
                .fetch_all(&self.pool.reader),
        )
        .await?;

        let mut total_records = 0;
        let mut bots = Vec::with_capacity(rows.len());
        for row in &rows {
            total_records = row
                .try_get("total_records")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            bots.push(decode(row)?);
        }

        Ok(BotListing {
            bots,
            total_records,
        })
    }

    async fn update(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        let sql = format!(
            "UPDATE bots SET name = ?, credential = ?, credential_confirmed = ?
             WHERE id = ?
             RETURNING {BOT_COLUMNS}"
        );
        let row = bounded(
            self.timeout,
            sqlx::query(&sql)
                .bind(&bot.name)
                .bind(&bot.credential)
                .bind(bot.credential_confirmed)
                .bind(bot.id.0)
                .fetch_optional(&self.pool.writer),
        )
        .await?;

        match row {
            Some(row) => decode(&row),
            None => Err(RepositoryError::EditConflict),
        }
    }

    async fn delete(&self, id: BotId) -> Result<(), RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }

        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM bots WHERE id = ?")
                .bind(id.0)
                .execute(&self.pool.writer),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
