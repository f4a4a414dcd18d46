//! # Chorus Engine
//!
//! The request path: classify the query, fan it out to every configured
//! capability, reconcile the candidates, then account and remember.
//!
//! ```text
//! Query ─► Classifier ─► { Orchestrator fan-out, Knowledge, Memory }
//!                               │
//!                               ▼
//!                          Synthesizer ─► tools ─► accounting ─► memory
//! ```
//!
//! Classification and synthesis are synchronous and pure; the only
//! suspension points are capability and tool calls.

pub mod classifier;
pub mod orchestrator;
pub mod pipeline;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use classifier::classify;
pub use orchestrator::{FanOut, GenerationParams, Orchestrator};
pub use pipeline::{Pipeline, PipelineSettings};
pub use synthesizer::synthesize;
