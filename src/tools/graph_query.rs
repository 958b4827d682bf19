//! Graph query tool: natural language in, formatted store records out.
//!
//! The tool asks the model for one Cypher statement grounded in the static
//! schema descriptor, validates it, executes it with a bounded timeout, and
//! flattens the rows. An empty result set is a successful "no results"
//! observation, never an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{StoreError, ToolError};
use crate::graph::{format_rows, validate_cypher, GraphSchema, GraphStore};
use crate::llm::LlmClient;

use super::Tool;

/// Translate a sub-question into Cypher and execute it.
pub struct GraphQueryTool {
    llm: Arc<dyn LlmClient>,
    store: Arc<dyn GraphStore>,
    schema: Arc<GraphSchema>,
}

impl GraphQueryTool {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        store: Arc<dyn GraphStore>,
        schema: Arc<GraphSchema>,
    ) -> Self {
        Self { llm, store, schema }
    }

    fn generation_prompt(&self) -> String {
        format!(
            "You translate questions about NBA players and teams into Cypher.\n\n\
             {}\n\
             Rules:\n\
             - Output exactly one read-only Cypher statement and nothing else. \
             No markdown, no explanation.\n\
             - Reference only the labels, relationship types, and properties \
             listed above.\n\
             - Match player and team names case-insensitively with toLower().\n\
             - If the question cannot be answered from this schema, emit a \
             query that matches nothing rather than inventing structure.",
            self.schema.grounding_text()
        )
    }
}

#[async_trait]
impl Tool for GraphQueryTool {
    fn name(&self) -> &str {
        "graph_query"
    }

    fn description(&self) -> &str {
        "Look up facts about NBA teams and players in the graph database: \
         which team a player plays for, positions, jersey numbers, team \
         cities, conferences, and divisions. Input is a plain-language \
         question about a player, a team, or the relationship between them."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let raw = self
            .llm
            .complete(&self.generation_prompt(), input)
            .await
            .map_err(|e| ToolError::QueryGeneration(format!("query model call failed: {}", e)))?;

        let cypher = strip_code_fences(&raw);

        if let Err(reason) = validate_cypher(cypher, &self.schema) {
            warn!(query = %cypher, %reason, "rejected generated query");
            return Err(ToolError::QueryGeneration(reason));
        }

        debug!(query = %cypher, "executing generated query");

        match self.store.run(cypher).await {
            Ok(result) => Ok(format_rows(&result)),
            Err(StoreError::Unreachable(message)) => Err(ToolError::QueryExecution {
                message,
                transient: true,
            }),
            Err(StoreError::Statement(message)) => Err(ToolError::QueryExecution {
                message,
                transient: false,
            }),
        }
    }
}

/// Strip a surrounding markdown code fence, if the model added one.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence.
    match body.split_once('\n') {
        Some((first, tail)) if !first.contains(' ') => tail.trim(),
        _ => body.trim(),
    }
}
