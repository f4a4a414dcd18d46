//! Error types for the chorus domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Capability-level failures are isolated and recorded; pipeline-level
//! failures propagate to the caller with a stable reason code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The top-level error type for all chorus operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by `Pipeline::handle`.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// No capabilities configured. Fatal, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Empty or oversized query, rejected before fan-out.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every configured capability failed or timed out.
    #[error("All {attempted} capabilities failed")]
    AllCapabilitiesFailed {
        attempted: usize,
        failures: Vec<CapabilityFailure>,
    },
}

impl PipelineError {
    /// Stable machine-readable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::InvalidInput(_) => "invalid_input",
            Self::AllCapabilitiesFailed { .. } => "all_capabilities_failed",
        }
    }
}

/// One capability's failure, kept as metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityFailure {
    /// The capability tag that failed.
    pub tag: String,
    /// Rendered failure reason.
    pub reason: String,
    /// Whether the failure was a timeout.
    pub timed_out: bool,
}

impl CapabilityFailure {
    pub fn new(tag: impl Into<String>, error: &ProviderError) -> Self {
        Self {
            tag: tag.into(),
            reason: error.to_string(),
            timed_out: matches!(error, ProviderError::Timeout(_)),
        }
    }
}

impl std::fmt::Display for CapabilityFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.tag, self.reason)
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error("Knowledge entry not found: {0}")]
    NotFound(String),

    #[error("Invalid knowledge entry: {0}")]
    InvalidEntry(String),

    #[error("Knowledge storage failed: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store I/O failed for key '{key}': {reason}")]
    Io { key: String, reason: String },

    #[error("Stored value for key '{key}' is corrupt: {reason}")]
    Corrupt { key: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),
}
