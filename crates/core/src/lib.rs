//! # Chorus Core
//!
//! Domain types, traits, and error definitions for the chorus orchestration
//! pipeline. This crate has **no framework dependencies**: it defines the
//! model that every other crate implements against.
//!
//! ## Layout
//!
//! - [`query`]: the immutable request and its context turns
//! - [`classification`]: the classifier's read-only output record
//! - [`synthesis`]: candidate responses and the final synthesized result
//! - [`provider`]: the text generation capability trait
//! - [`tool`]: the external tool invocation trait and registry
//! - [`error`]: the pipeline's failure taxonomy
//! - [`event`]: broadcast domain events for observability

pub mod classification;
pub mod error;
pub mod event;
pub mod provider;
pub mod query;
pub mod synthesis;
pub mod text;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use classification::{
    ClassificationRecord, ComplexityTier, ReasoningCategory, ToolName, ToolSuggestion, TopicDomain,
};
pub use error::{CapabilityFailure, Error, PipelineError, ProviderError, Result};
pub use event::{DomainEvent, EventBus};
pub use provider::{Capability, Generation, GenerationRequest, Provider};
pub use query::{ContextTurn, Query, Role};
pub use synthesis::{CandidateResponse, SynthesisStrategy, SynthesizedResult};
pub use tool::{Tool, ToolOutput, ToolRegistry};
