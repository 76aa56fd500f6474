use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::identity::CallerId;

/// Store-assigned surrogate key of a bot.
///
/// Values below 1 are never issued by the store and are treated as
/// "not found" without a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotId(pub i64);

impl BotId {
    /// Whether this id could ever name a stored row.
    pub fn is_valid(self) -> bool {
        self.0 >= 1
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BotId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A managed, credential-bearing bot owned by one caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: BotId,
    /// Caller that created the bot. Set once at insert, never from request input.
    pub owner_id: CallerId,
    pub created_at: DateTime<Utc>,
    /// Display label, 6 to 32 bytes.
    pub name: String,
    /// Secret issued by the external bot platform.
    pub credential: String,
    /// Outcome of the most recent credential confirmation.
    pub credential_confirmed: bool,
    pub active: bool,
}

/// Values the store needs to insert a bot. `id` and `created_at` are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBot {
    pub owner_id: CallerId,
    pub name: String,
    pub credential: String,
    pub credential_confirmed: bool,
}

/// Request body for creating a bot.
///
/// There is deliberately no owner field: the owner is always the
/// authenticated caller, and an `owner_id` key in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBotRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub credential: String,
}

/// Partial update. Only `name` and `credential` are mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBotRequest {
    pub name: Option<String>,
    pub credential: Option<String>,
}
