//! Per-model pricing and token cost estimation.
//!
//! Prices are USD per 1 million tokens, input and output separately.
//! Backends report a single total, so estimates split it 50/50
//! (`input = total / 2`, `output = total - input`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Model whose price is used when a model id matches nothing.
pub const DEFAULT_PRICING_MODEL: &str = "openai/gpt-4o-mini";

const PROVIDER_PREFIXES: &[&str] = &[
    "openai",
    "anthropic",
    "google",
    "mistral",
    "deepseek",
    "meta-llama",
];

/// (model, input $/M, output $/M)
const BUILTIN_PRICES: &[(&str, f64, f64)] = &[
    ("anthropic/claude-sonnet-4", 3.0, 15.0),
    ("anthropic/claude-opus-4", 15.0, 75.0),
    ("anthropic/claude-3-5-sonnet", 3.0, 15.0),
    ("anthropic/claude-3-5-haiku", 0.8, 4.0),
    ("anthropic/claude-3-haiku", 0.25, 1.25),
    ("openai/gpt-4o", 2.5, 10.0),
    ("openai/gpt-4o-mini", 0.15, 0.6),
    ("openai/gpt-4-turbo", 10.0, 30.0),
    ("openai/o1", 15.0, 60.0),
    ("openai/o3-mini", 1.1, 4.4),
    ("google/gemini-2.0-flash", 0.1, 0.4),
    ("google/gemini-1.5-pro", 1.25, 5.0),
    ("meta-llama/llama-3.1-70b", 0.52, 0.75),
    ("meta-llama/llama-3.1-8b", 0.055, 0.055),
    ("mistral/mistral-large", 2.0, 6.0),
    ("mistral/mistral-small", 0.2, 0.6),
    ("deepseek/deepseek-chat", 0.27, 1.1),
    ("deepseek/deepseek-reasoner", 0.55, 2.19),
];

/// Per-million-token pricing for a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub input_per_m: f64,
    pub output_per_m: f64,
}

impl ModelPricing {
    pub fn new(input_per_m: f64, output_per_m: f64) -> Self {
        Self {
            input_per_m,
            output_per_m,
        }
    }

    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (input_tokens as f64 * self.input_per_m + output_tokens as f64 * self.output_per_m)
            / 1_000_000.0
    }
}

/// Result of pricing one token total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    /// The model id that was asked for
    pub model: String,
    /// The table key whose price was used, if any
    pub priced_as: Option<String>,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub cost_usd: f64,
    /// True when the default model's price was substituted
    pub fallback: bool,
}

/// Thread-safe pricing table with built-in prices and runtime overrides.
pub struct PricingTable {
    prices: RwLock<HashMap<String, ModelPricing>>,
    default_model: String,
}

impl PricingTable {
    /// Built-in prices, falling back to [`DEFAULT_PRICING_MODEL`].
    pub fn with_defaults() -> Self {
        let prices = BUILTIN_PRICES
            .iter()
            .map(|(model, input, output)| (model.to_string(), ModelPricing::new(*input, *output)))
            .collect();
        Self {
            prices: RwLock::new(prices),
            default_model: DEFAULT_PRICING_MODEL.into(),
        }
    }

    /// A table with no prices; every estimate is zero until `set` is called.
    pub fn empty() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            default_model: DEFAULT_PRICING_MODEL.into(),
        }
    }

    /// Change the model used for unknown ids.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn get(&self, model: &str) -> Option<ModelPricing> {
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(model)
            .copied()
    }

    /// Add or replace pricing for a model.
    pub fn set(&self, model: impl Into<String>, pricing: ModelPricing) {
        self.prices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(model.into(), pricing);
    }

    /// Resolve a model id to a table entry.
    ///
    /// Tries an exact key, then the id under each known provider prefix
    /// (`gpt-4o` → `openai/gpt-4o`), then the longest key whose bare name
    /// prefixes the bare id at a `-` boundary
    /// (`gpt-4o-mini-2024-07-18` → `openai/gpt-4o-mini`, but `gpt-4oz` is unknown).
    pub fn resolve(&self, model: &str) -> Option<(String, ModelPricing)> {
        let prices = self.prices.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(p) = prices.get(model) {
            return Some((model.to_string(), *p));
        }

        for prefix in PROVIDER_PREFIXES {
            let key = format!("{prefix}/{model}");
            if let Some(p) = prices.get(&key) {
                return Some((key, *p));
            }
        }

        let lower = model.to_lowercase();
        let bare = lower.rsplit('/').next().unwrap_or(&lower);
        prices
            .iter()
            .filter(|(key, _)| {
                let bare_key = key.rsplit('/').next().unwrap_or(key).to_lowercase();
                bare.strip_prefix(bare_key.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
            })
            .max_by_key(|(key, _)| key.rsplit('/').next().unwrap_or(key).len())
            .map(|(key, p)| (key.clone(), *p))
    }

    /// Cost of an explicit input/output split. Unknown models use the
    /// default model's price.
    pub fn compute_cost(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        self.resolve(model)
            .or_else(|| self.resolve(&self.default_model))
            .map_or(0.0, |(_, p)| p.cost(input_tokens, output_tokens))
    }

    /// Price a total token count with the 50/50 input/output split.
    pub fn estimate(&self, model: &str, total_tokens: u32) -> CostEstimate {
        let input_tokens = total_tokens / 2;
        let output_tokens = total_tokens - input_tokens;

        let (priced_as, pricing, fallback) = match self.resolve(model) {
            Some((key, p)) => (Some(key), Some(p), false),
            None => match self.resolve(&self.default_model) {
                Some((key, p)) => {
                    debug!(model, default = %key, "Unknown model priced as default");
                    (Some(key), Some(p), true)
                }
                None => (None, None, true),
            },
        };

        CostEstimate {
            model: model.to_string(),
            priced_as,
            input_tokens,
            output_tokens,
            cost_usd: pricing.map_or(0.0, |p| p.cost(input_tokens, output_tokens)),
            fallback,
        }
    }

    /// All priced model ids, sorted.
    pub fn models(&self) -> Vec<String> {
        let prices = self.prices.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = prices.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.prices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
