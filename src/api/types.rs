//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::agent::{AgentOutcome, AgentStep};

/// Request to answer a question.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub question: String,
}

/// Response for one answered question: the input, the final output, and
/// the complete ordered trace.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// Original question
    pub input: String,

    /// Final answer text
    pub output: String,

    /// Ordered trace of reasoning/tool/observation steps
    pub intermediate_steps: Vec<TraceStep>,
}

/// One trace entry in wire form.
#[derive(Debug, Clone, Serialize)]
pub struct TraceStep {
    pub action: AgentAction,

    /// Tool output or a textual description of the tool-level failure
    pub observation: String,
}

/// The action half of a trace entry.
#[derive(Debug, Clone, Serialize)]
pub struct AgentAction {
    /// Selected tool name
    pub tool: String,

    /// Input passed to the tool
    pub tool_input: String,

    /// Reasoning text the model emitted for this step
    pub log: String,
}

impl From<AgentStep> for TraceStep {
    fn from(step: AgentStep) -> Self {
        Self {
            action: AgentAction {
                tool: step.tool,
                tool_input: step.tool_input,
                log: step.log,
            },
            observation: step.observation,
        }
    }
}

impl From<AgentOutcome> for ChatResponse {
    fn from(outcome: AgentOutcome) -> Self {
        Self {
            input: outcome.input,
            output: outcome.output,
            intermediate_steps: outcome.steps.into_iter().map(TraceStep::from).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// "connected" or the store error text
    pub store: String,
}
