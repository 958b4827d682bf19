//! Shared test doubles: a scripted language model and an in-memory store
//! fixture (LeBron James plays for the Lakers).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::error::{AgentError, StoreError};
use crate::graph::{GraphStore, ResultSet};
use crate::llm::LlmClient;

/// Deterministic model stub that returns scripted replies in order.
///
/// Both the reasoning loop and the query-generation step draw from the
/// same script, in call order, so a whole request can be replayed exactly.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AgentError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AgentError::Upstream("script exhausted".to_string()))
    }
}

/// Model stub that is always unreachable.
pub struct DownLlm;

#[async_trait]
impl LlmClient for DownLlm {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AgentError> {
        Err(AgentError::Upstream("connection refused".to_string()))
    }
}

#[derive(Clone, Copy)]
enum FixtureMode {
    Healthy,
    /// Connection-level failure on every statement.
    Unreachable,
    /// Store accepts the connection but rejects every statement.
    Rejecting,
}

/// In-memory graph store fixture.
///
/// Any statement mentioning LeBron James returns the Lakers row; `RETURN 1`
/// answers the health ping; everything else matches zero rows. Executed
/// statements are recorded for assertions.
#[derive(Clone)]
pub struct FixtureStore {
    mode: FixtureMode,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FixtureStore {
    pub fn new() -> Self {
        Self::with_mode(FixtureMode::Healthy)
    }

    pub fn unreachable() -> Self {
        Self::with_mode(FixtureMode::Unreachable)
    }

    pub fn rejecting() -> Self {
        Self::with_mode(FixtureMode::Rejecting)
    }

    fn with_mode(mode: FixtureMode) -> Self {
        Self {
            mode,
            executed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphStore for FixtureStore {
    async fn run(&self, statement: &str) -> Result<ResultSet, StoreError> {
        match self.mode {
            FixtureMode::Healthy => {}
            FixtureMode::Unreachable => {
                return Err(StoreError::Unreachable("connection refused".to_string()));
            }
            FixtureMode::Rejecting => {
                return Err(StoreError::Statement(
                    "Neo.ClientError.Statement.SyntaxError: invalid input".to_string(),
                ));
            }
        }
        self.executed.lock().unwrap().push(statement.to_string());

        if statement.to_lowercase().contains("lebron james") {
            return Ok(ResultSet {
                columns: vec!["t.name".to_string()],
                rows: vec![vec![json!("Los Angeles Lakers")]],
            });
        }
        if statement.trim() == "RETURN 1" {
            return Ok(ResultSet {
                columns: vec!["1".to_string()],
                rows: vec![vec![json!(1)]],
            });
        }
        Ok(ResultSet::empty())
    }
}
