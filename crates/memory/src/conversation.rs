//! Per-user bounded conversation memory.
//!
//! Each user owns an ordered log capped at `max_turns`; once exceeded the
//! oldest turns are dropped. Logs are locked individually, so concurrent
//! requests for different users never contend and two appends for the same
//! user never lose a turn.

use chorus_core::error::StoreError;
use chorus_core::event::{DomainEvent, EventBus};
use chorus_core::query::{ContextTurn, Role};
use chorus_core::text::word_set;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::store::KeyValueStore;

/// User id used when a query carries none.
pub const ANONYMOUS_USER: &str = "anonymous";

/// One remembered turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_context(&self) -> ContextTurn {
        ContextTurn {
            role: self.role,
            content: self.text.clone(),
        }
    }
}

/// A historical turn scored against a new query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTurn {
    pub turn: ConversationTurn,
    pub relevance: f64,
}

/// Word-overlap ratio: |A ∩ B| / max(|A|, |B|) over distinct words.
pub fn relevance(turn_text: &str, query: &str) -> f64 {
    let a = word_set(turn_text);
    let b = word_set(query);
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / denom as f64
}

type UserLog = Arc<Mutex<VecDeque<ConversationTurn>>>;

/// Conversation memory shared across requests.
pub struct ConversationMemory {
    max_turns: usize,
    logs: RwLock<HashMap<String, UserLog>>,
    events: Option<Arc<EventBus>>,
}

impl ConversationMemory {
    /// `max_turns` is clamped to at least 1.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(1),
            logs: RwLock::new(HashMap::new()),
            events: None,
        }
    }

    /// Publish `MemoryAppended` events to this bus.
    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    async fn existing_log(&self, user_id: &str) -> Option<UserLog> {
        self.logs.read().await.get(user_id).cloned()
    }

    fn extend_pruned(&self, log: &mut VecDeque<ConversationTurn>, turns: Vec<ConversationTurn>) -> usize {
        log.extend(turns);
        while log.len() > self.max_turns {
            log.pop_front();
        }
        log.len()
    }

    /// Append turns atomically for one user, pruning to the cap.
    ///
    /// The map lock is held for the whole append, so `clear` cannot
    /// detach a log that is being written.
    async fn push(&self, user_id: &str, turns: Vec<ConversationTurn>) {
        let count = turns.len();
        let existing = {
            let logs = self.logs.read().await;
            match logs.get(user_id) {
                Some(log) => {
                    let mut log = log.lock().await;
                    Ok(self.extend_pruned(&mut log, turns))
                }
                None => Err(turns),
            }
        };
        let retained = match existing {
            Ok(retained) => retained,
            Err(turns) => {
                let mut logs = self.logs.write().await;
                let mut log = logs.entry(user_id.to_string()).or_default().lock().await;
                self.extend_pruned(&mut log, turns)
            }
        };

        debug!(user_id, appended = count, retained, "Conversation memory updated");
        if let Some(events) = &self.events {
            events.publish(DomainEvent::MemoryAppended {
                user_id: user_id.to_string(),
                turns: count,
                timestamp: Utc::now(),
            });
        }
    }

    pub async fn append(&self, user_id: &str, turn: ConversationTurn) {
        self.push(user_id, vec![turn]).await;
    }

    /// Record a user query and the assistant's answer as one atomic append.
    pub async fn record_exchange(&self, user_id: &str, query: &str, answer: &str) {
        self.push(
            user_id,
            vec![
                ConversationTurn::new(Role::User, query),
                ConversationTurn::new(Role::Assistant, answer),
            ],
        )
        .await;
    }

    /// Full retained history, oldest first.
    pub async fn history(&self, user_id: &str) -> Vec<ConversationTurn> {
        match self.existing_log(user_id).await {
            Some(log) => log.lock().await.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// The last `n` turns, oldest first.
    pub async fn recent(&self, user_id: &str, n: usize) -> Vec<ConversationTurn> {
        let history = self.history(user_id).await;
        let skip = history.len().saturating_sub(n);
        history.into_iter().skip(skip).collect()
    }

    /// Top-`k` turns by word overlap with `query`, most relevant first.
    /// Equal scores keep chronological order; zero-overlap turns are skipped.
    pub async fn relevant(&self, user_id: &str, query: &str, k: usize) -> Vec<ScoredTurn> {
        let mut scored: Vec<ScoredTurn> = self
            .history(user_id)
            .await
            .into_iter()
            .map(|turn| {
                let relevance = relevance(&turn.text, query);
                ScoredTurn { turn, relevance }
            })
            .filter(|s| s.relevance > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }

    pub async fn len(&self, user_id: &str) -> usize {
        match self.existing_log(user_id).await {
            Some(log) => log.lock().await.len(),
            None => 0,
        }
    }

    /// Drop a user's history and its slot. Returns whether the user had any.
    pub async fn clear(&self, user_id: &str) -> bool {
        let mut logs = self.logs.write().await;
        match logs.remove(user_id) {
            Some(log) => {
                let mut log = log.lock().await;
                let had_turns = !log.is_empty();
                log.clear();
                had_turns
            }
            None => false,
        }
    }

    /// Users with a log, sorted.
    pub async fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.logs.read().await.keys().cloned().collect();
        users.sort();
        users
    }

    fn store_key(user_id: &str) -> String {
        format!("memory/{user_id}")
    }

    /// Persist one user's history.
    pub async fn snapshot(&self, store: &dyn KeyValueStore, user_id: &str) -> Result<usize, StoreError> {
        let history = self.history(user_id).await;
        let key = Self::store_key(user_id);
        let value = serde_json::to_value(&history).map_err(|e| StoreError::Corrupt {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        store.put(&key, value).await?;
        Ok(history.len())
    }

    /// Replace one user's history from the store, pruned to the cap.
    /// Returns the number of turns retained, or `None` if nothing was stored.
    pub async fn restore(&self, store: &dyn KeyValueStore, user_id: &str) -> Result<Option<usize>, StoreError> {
        let key = Self::store_key(user_id);
        let Some(value) = store.get(&key).await? else {
            return Ok(None);
        };
        let turns: Vec<ConversationTurn> =
            serde_json::from_value(value).map_err(|e| StoreError::Corrupt {
                key: key.clone(),
                reason: e.to_string(),
            })?;

        let mut logs = self.logs.write().await;
        let log = logs.entry(user_id.to_string()).or_default();
        let mut log = log.lock().await;
        log.clear();
        Ok(Some(self.extend_pruned(&mut log, turns)))
    }
}
