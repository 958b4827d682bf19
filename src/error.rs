//! Error taxonomy for the agent core.
//!
//! Tool-level failures are absorbed into the trace as observations and the
//! reasoning loop continues; only failures of the reasoning step itself
//! (the language model being unreachable) abort a request.

use thiserror::Error;

/// A failure inside a single tool invocation.
///
/// These never crash a request: the loop renders them as observation text
/// and lets the model retry or fall back to another tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model selected a tool name that is not registered.
    #[error("unknown tool: {0}")]
    NotFound(String),

    /// Query generation produced something that is not a valid, schema-
    /// conforming Cypher statement. The query was never sent to the store.
    #[error("query generation failed: {0}")]
    QueryGeneration(String),

    /// The store rejected or failed to execute a validated query.
    #[error("query execution failed: {message}")]
    QueryExecution {
        message: String,
        /// True for connection drops and timeouts, false when the store
        /// itself rejected the statement.
        transient: bool,
    },

    /// The calculator input was not a well-formed arithmetic expression.
    #[error("could not parse expression: {0}")]
    ExpressionParse(String),

    /// The expression was well-formed but could not be evaluated.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),
}

/// A failure that aborts the whole request.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language model collaborator is unreachable or misbehaving.
    #[error("language model unavailable: {0}")]
    Upstream(String),
}

/// A failure reported by the graph store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection error or timeout talking to the store.
    #[error("graph store unreachable: {0}")]
    Unreachable(String),

    /// The store accepted the connection but rejected the statement.
    #[error("statement rejected by store: {0}")]
    Statement(String),
}
