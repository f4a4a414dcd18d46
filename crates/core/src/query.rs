//! Query and context turn value objects.
//!
//! A [`Query`] is created once per incoming request and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// A synthesized answer
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// A single prior turn handed to a capability as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTurn {
    pub role: Role,
    pub content: String,
}

impl ContextTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An incoming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    /// The raw query text
    pub text: String,

    /// Ordered prior-turn context supplied by the caller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextTurn>,

    /// Optional user identifier; keys conversation memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Free-form preference bag (e.g. `expertise = "rust,databases"`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub preferences: HashMap<String, String>,

    /// When the request was received
    pub received_at: DateTime<Utc>,
}

impl Query {
    /// Create a query with no context, user, or preferences.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: Vec::new(),
            user_id: None,
            preferences: HashMap::new(),
            received_at: Utc::now(),
        }
    }

    pub fn with_context(mut self, context: Vec<ContextTurn>) -> Self {
        self.context = context;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_preference(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.preferences.insert(key.into(), value.into());
        self
    }

    /// User expertise values from the `expertise` preference, comma-separated.
    pub fn expertise(&self) -> Vec<String> {
        self.preferences
            .get("expertise")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
