//! Domain event system — decoupled observation of the pipeline.
//!
//! Events are published as requests move through classification, fan-out,
//! and synthesis. Subscribers (CLI progress output, tests, metrics sinks)
//! react without the pipeline knowing about them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::classification::{ReasoningCategory, TopicDomain};
use crate::synthesis::SynthesisStrategy;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// The classifier produced a record for a query
    QueryClassified {
        category: ReasoningCategory,
        domain: TopicDomain,
        strategy: SynthesisStrategy,
        timestamp: DateTime<Utc>,
    },

    /// A capability returned a candidate
    CandidateReceived {
        capability: String,
        token_count: u32,
        latency_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// A capability failed or timed out
    CapabilityFailed {
        capability: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A final answer was produced
    ResultSynthesized {
        strategy: SynthesisStrategy,
        source: String,
        total_tokens: u32,
        timestamp: DateTime<Utc>,
    },

    /// The knowledge index was mutated
    KnowledgeChanged {
        operation: String, // "add", "update", "delete"
        entry_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Turns were appended to a user's conversation memory
    MemoryAppended {
        user_id: String,
        turns: usize,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // no subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
