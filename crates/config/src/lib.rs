//! Configuration loading, validation, and management for chorus.
//!
//! Loads configuration from `~/.chorus/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.chorus/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shared API key (can be overridden per capability)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Fan-out settings
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Generation backends, in enumeration order
    #[serde(default)]
    pub capabilities: Vec<CapabilityConfig>,

    /// Conversation memory settings
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Knowledge index settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Tool invocation settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Cost accounting settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("orchestrator", &self.orchestrator)
            .field("capabilities", &self.capabilities)
            .field("memory", &self.memory)
            .field("knowledge", &self.knowledge)
            .field("tools", &self.tools)
            .field("telemetry", &self.telemetry)
            .finish()
    }
}

impl std::fmt::Debug for CapabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityConfig")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("confidence", &self.confidence)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Default per-capability timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Queries longer than this are rejected
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_query_chars() -> usize {
    8000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_query_chars: default_max_query_chars(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Which wire protocol a capability speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    #[default]
    OpenaiCompat,
    Anthropic,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CapabilityConfig {
    /// Capability tag, unique across the list
    pub name: String,

    #[serde(default)]
    pub kind: CapabilityKind,

    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Overrides `orchestrator.timeout_secs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Confidence assigned to this capability's candidates
    #[serde(default = "default_capability_confidence")]
    pub confidence: f64,
}

fn default_capability_confidence() -> f64 {
    0.8
}

impl CapabilityConfig {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CapabilityKind::default(),
            model: model.into(),
            api_key: None,
            api_url: None,
            timeout_secs: None,
            confidence: default_capability_confidence(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Per-user turn cap
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,

    /// Relevant prior turns added to generation context
    #[serde(default = "default_recall_k")]
    pub recall_k: usize,
}

fn default_max_turns() -> usize {
    50
}
fn default_recall_k() -> usize {
    5
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            recall_k: default_recall_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Load the built-in corpus at startup
    #[serde(default = "default_true")]
    pub seed_corpus: bool,

    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    #[serde(default = "default_similarity_floor")]
    pub similarity_floor: f32,

    #[serde(default = "default_vector_top_k")]
    pub vector_top_k: usize,

    /// Directory for file-backed index snapshots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}
fn default_result_limit() -> usize {
    5
}
fn default_similarity_floor() -> f32 {
    0.1
}
fn default_vector_top_k() -> usize {
    20
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            seed_corpus: true,
            result_limit: default_result_limit(),
            similarity_floor: default_similarity_floor(),
            vector_top_k: default_vector_top_k(),
            snapshot_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Suggested tools invoked per request
    #[serde(default = "default_max_invocations")]
    pub max_invocations: usize,
}

fn default_max_invocations() -> usize {
    2
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_invocations: default_max_invocations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Pricing used for models missing from the table
    #[serde(default = "default_pricing_model")]
    pub default_pricing_model: String,

    /// Custom model pricing overrides (model name → pricing)
    #[serde(default)]
    pub custom_pricing: HashMap<String, PricingOverrideConfig>,
}

fn default_pricing_model() -> String {
    "openai/gpt-4o-mini".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_pricing_model: default_pricing_model(),
            custom_pricing: HashMap::new(),
        }
    }
}

/// Custom per-million-token pricing for a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOverrideConfig {
    /// Price per 1M input tokens in USD
    pub input_per_m: f64,
    /// Price per 1M output tokens in USD
    pub output_per_m: f64,
}

impl AppConfig {
    /// Load configuration from the default path (~/.chorus/config.toml).
    ///
    /// Environment overrides:
    /// - `CHORUS_API_KEY`, `OPENAI_API_KEY`, `OPENROUTER_API_KEY` fill a missing `api_key`
    /// - `CHORUS_TIMEOUT_SECS` replaces `orchestrator.timeout_secs`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CHORUS_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(raw) = std::env::var("CHORUS_TIMEOUT_SECS") {
            config.orchestrator.timeout_secs = raw.parse().map_err(|_| {
                ConfigError::ValidationError(format!(
                    "CHORUS_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".chorus")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let orch = &self.orchestrator;
        if !(0.0..=2.0).contains(&orch.temperature) {
            return Err(ConfigError::ValidationError(
                "orchestrator.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if orch.max_query_chars == 0 {
            return Err(ConfigError::ValidationError(
                "orchestrator.max_query_chars must be > 0".into(),
            ));
        }
        if orch.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "orchestrator.timeout_secs must be > 0".into(),
            ));
        }

        let mut seen = HashSet::new();
        for cap in &self.capabilities {
            if cap.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "capability name must not be empty".into(),
                ));
            }
            if !seen.insert(cap.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate capability name '{}'",
                    cap.name
                )));
            }
            if !(0.0..=1.0).contains(&cap.confidence) {
                return Err(ConfigError::ValidationError(format!(
                    "capability '{}' confidence must be between 0.0 and 1.0",
                    cap.name
                )));
            }
        }

        if self.memory.max_turns == 0 {
            return Err(ConfigError::ValidationError(
                "memory.max_turns must be > 0".into(),
            ));
        }

        if !(0.0..1.0).contains(&self.knowledge.similarity_floor) {
            return Err(ConfigError::ValidationError(
                "knowledge.similarity_floor must be in [0.0, 1.0)".into(),
            ));
        }

        Ok(())
    }

    /// Effective timeout for a capability.
    pub fn timeout_for(&self, capability: &CapabilityConfig) -> std::time::Duration {
        std::time::Duration::from_secs(
            capability
                .timeout_secs
                .unwrap_or(self.orchestrator.timeout_secs),
        )
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let mut config = Self::default();
        config
            .capabilities
            .push(CapabilityConfig::new("openai", "gpt-4o-mini"));
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            orchestrator: OrchestratorConfig::default(),
            capabilities: Vec::new(),
            memory: MemoryConfig::default(),
            knowledge: KnowledgeConfig::default(),
            tools: ToolsConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
