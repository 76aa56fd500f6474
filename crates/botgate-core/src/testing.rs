//! In-memory fakes of the core ports for unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use botgate_types::bot::{Bot, BotId, NewBot};
use botgate_types::error::{RepositoryError, TokenCheckError};
use botgate_types::identity::{Capability, CallerId};

use crate::credential::TokenValidator;
use crate::query::{QueryPlan, SearchTerm, SortColumn};
use crate::repository::SortOrder;
use crate::repository::bot::{BotListing, BotRepository};
use crate::repository::permission::CapabilityChecker;

#[derive(Default)]
struct BotsState {
    rows: BTreeMap<i64, Bot>,
    next_id: i64,
    fail_next: Option<RepositoryError>,
    vanish_on_write: Option<BotId>,
}

/// Bot store backed by a map, with call counters and fault injection.
#[derive(Clone, Default)]
pub struct MemoryBots {
    state: Arc<Mutex<BotsState>>,
    calls: Arc<AtomicUsize>,
    body_reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl MemoryBots {
    pub fn seed(&self, owner: CallerId, name: &str) -> Bot {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let bot = Bot {
            id: BotId(state.next_id),
            owner_id: owner,
            created_at: Utc::now(),
            name: name.to_string(),
            credential: format!("{name}-token"),
            credential_confirmed: false,
            active: true,
        };
        state.rows.insert(bot.id.0, bot.clone());
        bot
    }

    pub fn fail_next_with(&self, err: RepositoryError) {
        self.state.lock().unwrap().fail_next = Some(err);
    }

    /// Delete `id` right before the next update of it lands.
    pub fn vanish_before_write(&self, id: BotId) {
        self.state.lock().unwrap().vanish_on_write = Some(id);
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, BotsState>, RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let failure = state.fail_next.take();
        match failure {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn sort_key(bot: &Bot, column: SortColumn) -> String {
    match column {
        SortColumn::Id => format!("{:020}", bot.id.0),
        SortColumn::OwnerId => format!("{:020}", bot.owner_id.0),
        SortColumn::Name => bot.name.clone(),
        SortColumn::Credential => bot.credential.clone(),
    }
}

impl BotRepository for MemoryBots {
    async fn insert(&self, bot: &NewBot) -> Result<Bot, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.enter()?;
        state.next_id += 1;
        let stored = Bot {
            id: BotId(state.next_id),
            owner_id: bot.owner_id,
            created_at: Utc::now(),
            name: bot.name.clone(),
            credential: bot.credential.clone(),
            credential_confirmed: bot.credential_confirmed,
            active: true,
        };
        state.rows.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: BotId) -> Result<Bot, RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }
        self.body_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.enter()?;
        let found = state.rows.get(&id.0).cloned();
        found.ok_or(RepositoryError::NotFound)
    }

    async fn get_owner(&self, id: BotId) -> Result<CallerId, RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }
        let state = self.enter()?;
        let owner = state.rows.get(&id.0).map(|b| b.owner_id);
        owner.ok_or(RepositoryError::NotFound)
    }

    async fn list(
        &self,
        plan: &QueryPlan,
        owner: Option<CallerId>,
    ) -> Result<BotListing, RepositoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.enter()?;

        let mut matching: Vec<Bot> = state
            .rows
            .values()
            .filter(|b| owner.is_none_or(|o| b.owner_id == o))
            .filter(|b| match &plan.search {
                SearchTerm::Any => true,
                SearchTerm::Lexemes(lexemes) => {
                    let words: HashSet<String> = match SearchTerm::parse(&b.name) {
                        SearchTerm::Lexemes(words) => words.into_iter().collect(),
                        SearchTerm::Any => HashSet::new(),
                    };
                    !lexemes.is_empty() && lexemes.iter().all(|l| words.contains(l))
                }
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let ord = sort_key(a, plan.sort_column).cmp(&sort_key(b, plan.sort_column));
            let ord = match plan.sort_order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            };
            ord.then(a.id.cmp(&b.id))
        });

        let total_records = matching.len() as i64;
        let bots = matching
            .into_iter()
            .skip(plan.offset() as usize)
            .take(plan.limit() as usize)
            .collect::<Vec<_>>();

        // Window count semantics: no rows on the page means no count.
        let total_records = if bots.is_empty() { 0 } else { total_records };
        Ok(BotListing { bots, total_records })
    }

    async fn update(&self, bot: &Bot) -> Result<Bot, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.enter()?;
        if state.vanish_on_write == Some(bot.id) {
            state.rows.remove(&bot.id.0);
            state.vanish_on_write = None;
        }
        let updated = state.rows.get_mut(&bot.id.0).map(|row| {
            row.name = bot.name.clone();
            row.credential = bot.credential.clone();
            row.credential_confirmed = bot.credential_confirmed;
            row.clone()
        });
        updated.ok_or(RepositoryError::EditConflict)
    }

    async fn delete(&self, id: BotId) -> Result<(), RepositoryError> {
        if !id.is_valid() {
            return Err(RepositoryError::NotFound);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.enter()?;
        let removed = state.rows.remove(&id.0);
        removed.map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// Capability grants held in a set.
#[derive(Clone, Default)]
pub struct MemoryGrants {
    grants: Arc<Mutex<HashSet<(i64, Capability)>>>,
}

impl MemoryGrants {
    pub fn grant(&self, caller: CallerId, capability: Capability) {
        self.grants.lock().unwrap().insert((caller.0, capability));
    }
}

impl CapabilityChecker for MemoryGrants {
    async fn has_capability(
        &self,
        caller: CallerId,
        capability: Capability,
    ) -> Result<bool, RepositoryError> {
        Ok(self.grants.lock().unwrap().contains(&(caller.0, capability)))
    }
}

/// Token validator that returns a fixed answer.
#[derive(Clone)]
pub struct ScriptedTokens {
    answer: Option<bool>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTokens {
    pub fn confirmed(answer: bool) -> Self {
        Self {
            answer: Some(answer),
            calls: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            answer: None,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenValidator for ScriptedTokens {
    async fn confirm(&self, _credential: &str) -> Result<bool, TokenCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| TokenCheckError::Transport("connection refused".to_string()))
    }
}
