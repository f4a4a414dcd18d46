//! Built-in tool implementations for chorus.
//!
//! Each tool registers under the classifier's tool name, so a suggestion
//! such as `calculation` resolves directly to an implementation. Suggested
//! tools without a registered implementation are simply not invoked.

pub mod calculation;
pub mod knowledge_lookup;

use std::sync::Arc;

use chorus_core::tool::ToolRegistry;
use chorus_memory::KnowledgeIndex;

pub use calculation::CalculationTool;
pub use knowledge_lookup::KnowledgeLookupTool;

/// Registry with every built-in tool.
pub fn default_registry(knowledge: Arc<KnowledgeIndex>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CalculationTool));
    registry.register(Box::new(KnowledgeLookupTool::new(knowledge)));
    registry
}
