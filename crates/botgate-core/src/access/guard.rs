//! Resource ownership check.

use botgate_types::bot::BotId;
use botgate_types::error::RepositoryError;
use botgate_types::identity::CallerId;

use crate::repository::bot::BotRepository;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied,
    NotFound,
}

/// Decides whether a caller owns a bot.
///
/// Reads only the owner column, so nothing else about the bot is loaded
/// before the check passes.
pub struct AuthorizationGuard<'a, B: BotRepository> {
    bots: &'a B,
}

impl<'a, B: BotRepository> AuthorizationGuard<'a, B> {
    pub fn new(bots: &'a B) -> Self {
        Self { bots }
    }

    pub async fn authorize(
        &self,
        caller: CallerId,
        bot_id: BotId,
    ) -> Result<Authorization, RepositoryError> {
        match self.bots.get_owner(bot_id).await {
            Ok(owner) if owner == caller => Ok(Authorization::Allowed),
            Ok(_) => Ok(Authorization::Denied),
            Err(RepositoryError::NotFound) => Ok(Authorization::NotFound),
            Err(e) => Err(e),
        }
    }
}
