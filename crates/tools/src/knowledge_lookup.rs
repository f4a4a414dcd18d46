//! Knowledge lookup tool, backed by the shared knowledge index.

use async_trait::async_trait;
use chorus_core::classification::{ToolName, TopicDomain};
use chorus_core::error::ToolError;
use chorus_core::tool::{Tool, ToolOutput};
use chorus_memory::{KnowledgeIndex, SearchRequest};
use std::sync::Arc;

const DEFAULT_TOP_K: usize = 3;

pub struct KnowledgeLookupTool {
    index: Arc<KnowledgeIndex>,
}

impl KnowledgeLookupTool {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl Tool for KnowledgeLookupTool {
    fn name(&self) -> &str {
        ToolName::KnowledgeLookup.as_str()
    }

    fn description(&self) -> &str {
        "Look up entries in the knowledge index related to the query."
    }

    async fn invoke(&self, parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let query = parameters["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let top_k = parameters["top_k"]
            .as_u64()
            .map_or(DEFAULT_TOP_K, |k| k.clamp(1, 10) as usize);

        let mut request = SearchRequest::new(query).with_limit(top_k);
        if let Some(domain) = parameters["domain"].as_str() {
            request = request.with_domain(TopicDomain::parse(domain));
        }

        let found = self.index.search(&request);
        if found.results.is_empty() {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: "no matching knowledge entries".into(),
            });
        }

        let titles: Vec<&str> = found
            .results
            .iter()
            .map(|r| r.entry.title.as_str())
            .collect();
        let data = serde_json::to_value(&found).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().to_string(),
            reason: e.to_string(),
        })?;

        Ok(ToolOutput {
            summary: format!("Related knowledge: {}", titles.join("; ")),
            data,
        })
    }
}
