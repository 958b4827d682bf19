//! Core reasoning loop implementation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::graph::GraphSchema;
use crate::llm::LlmClient;
use crate::tools::ToolRegistry;

use super::decision::{parse_decision, Decision};
use super::prompt::{build_system_prompt, build_user_prompt};

/// Degraded final answer when the iteration budget runs out.
pub const BUDGET_EXCEEDED_MESSAGE: &str =
    "I could not resolve this question within the step budget.";

/// One completed loop iteration: tool, input, reasoning text, observation.
///
/// Steps are appended to the trace and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStep {
    pub tool: String,
    pub tool_input: String,
    pub log: String,
    pub observation: String,
}

/// The result of one question: the input, the final output, and the full
/// ordered trace. Complete even when the budget was exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentOutcome {
    pub input: String,
    pub output: String,
    pub steps: Vec<AgentStep>,
}

/// The reasoning loop: selects and sequences tool invocations, then
/// assembles the final answer.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    schema: Arc<GraphSchema>,
    max_iterations: usize,
}

impl Agent {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
        schema: Arc<GraphSchema>,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            schema,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Answer one question.
    ///
    /// Tool-level failures become observations and the loop continues;
    /// only an unreachable language model aborts the request. The trace
    /// never grows past the iteration budget.
    pub async fn answer(&self, question: &str) -> Result<AgentOutcome, AgentError> {
        let system = build_system_prompt(&self.schema, &self.tools);
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 0..self.max_iterations {
            debug!(iteration = iteration + 1, "reasoning step");

            let user = build_user_prompt(question, &steps);
            let reply = self.llm.complete(&system, &user).await?;

            match parse_decision(&reply) {
                Ok(Decision::Final { thought, answer }) => {
                    info!(steps = steps.len(), %thought, "final answer");
                    return Ok(AgentOutcome {
                        input: question.to_string(),
                        output: answer,
                        steps,
                    });
                }
                Ok(Decision::UseTool {
                    thought,
                    tool,
                    tool_input,
                }) => {
                    debug!(%tool, %tool_input, "invoking tool");
                    let observation = match self.tools.invoke(&tool, &tool_input).await {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(%tool, error = %e, "tool failed");
                            format!("Tool failed: {}", e)
                        }
                    };
                    steps.push(AgentStep {
                        tool,
                        tool_input,
                        log: thought,
                        observation,
                    });
                }
                Err(reason) => {
                    warn!(%reason, "unparseable decision");
                    steps.push(AgentStep {
                        tool: String::new(),
                        tool_input: String::new(),
                        log: reply,
                        observation: format!(
                            "Could not parse that reply ({}). Respond with a single \
                             JSON decision object.",
                            reason
                        ),
                    });
                }
            }
        }

        warn!(budget = self.max_iterations, "iteration budget exceeded");
        Ok(AgentOutcome {
            input: question.to_string(),
            output: BUDGET_EXCEEDED_MESSAGE.to_string(),
            steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DownLlm, FixtureStore, ScriptedLlm};
    use crate::tools::{Calculator, GraphQueryTool};

    const LEBRON_CYPHER: &str = "MATCH (p:Player)-[:PLAYS_FOR]->(t:Team) \
         WHERE toLower(p.name) = 'lebron james' RETURN t.name";

    fn agent_with(llm: Arc<dyn crate::llm::LlmClient>, store: FixtureStore) -> Agent {
        let schema = Arc::new(GraphSchema::nba());
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(GraphQueryTool::new(
            llm.clone(),
            Arc::new(store),
            schema.clone(),
        )));
        tools.register(Arc::new(Calculator));
        Agent::new(llm, tools, schema, 8)
    }

    fn lebron_script() -> Vec<String> {
        vec![
            // Decision: use the graph tool.
            r#"{"thought": "factual lookup", "tool": "graph_query", "tool_input": "Which team does LeBron James play for?"}"#
                .to_string(),
            // Query generation inside the tool.
            LEBRON_CYPHER.to_string(),
            // Final answer.
            r#"{"thought": "observation has the team", "final_answer": "LeBron James plays for the Los Angeles Lakers."}"#
                .to_string(),
        ]
    }

    #[tokio::test]
    async fn factual_question_goes_through_the_graph_tool() {
        let llm = Arc::new(ScriptedLlm::new(lebron_script()));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent
            .answer("What team does LeBron James play for?")
            .await
            .unwrap();

        assert!(outcome.output.contains("Lakers"));
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].tool, "graph_query");
        assert!(outcome.steps[0].observation.contains("Los Angeles Lakers"));
    }

    #[tokio::test]
    async fn arithmetic_question_goes_through_the_calculator() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            r#"{"thought": "arithmetic", "tool": "calculator", "tool_input": "17 + 25"}"#
                .to_string(),
            r#"{"thought": "have the sum", "final_answer": "17 plus 25 is 42."}"#.to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent.answer("What is 17 plus 25?").await.unwrap();

        assert!(outcome.output.contains("42"));
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].tool, "calculator");
        assert_eq!(outcome.steps[0].observation, "42");
    }

    #[tokio::test]
    async fn repeated_runs_produce_identical_traces() {
        let question = "What team does LeBron James play for?";

        let first = agent_with(Arc::new(ScriptedLlm::new(lebron_script())), FixtureStore::new())
            .answer(question)
            .await
            .unwrap();
        let second = agent_with(Arc::new(ScriptedLlm::new(lebron_script())), FixtureStore::new())
            .answer(question)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_an_observation_and_the_loop_recovers() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            r#"{"thought": "", "tool": "web_search", "tool_input": "LeBron"}"#.to_string(),
            r#"{"thought": "", "final_answer": "I cannot answer that."}"#.to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent.answer("Who is LeBron?").await.unwrap();

        assert_eq!(outcome.steps.len(), 1);
        assert!(outcome.steps[0]
            .observation
            .contains("unknown tool: web_search"));
        assert_eq!(outcome.output, "I cannot answer that.");
    }

    #[tokio::test]
    async fn tool_failure_is_fed_back_not_fatal() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            r#"{"thought": "", "tool": "calculator", "tool_input": "1 / 0"}"#.to_string(),
            r#"{"thought": "", "final_answer": "That division is undefined."}"#.to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent.answer("What is 1 divided by 0?").await.unwrap();

        assert!(outcome.steps[0].observation.contains("division by zero"));
        assert_eq!(outcome.output, "That division is undefined.");
    }

    #[tokio::test]
    async fn malformed_query_is_retried_within_the_budget() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            r#"{"thought": "", "tool": "graph_query", "tool_input": "Who coaches LeBron?"}"#
                .to_string(),
            // First generation references a relationship the schema lacks.
            "MATCH (p:Player)-[:COACHED_BY]->(c:Coach) RETURN c.name".to_string(),
            r#"{"thought": "retry", "tool": "graph_query", "tool_input": "Which team does LeBron James play for?"}"#
                .to_string(),
            LEBRON_CYPHER.to_string(),
            r#"{"thought": "", "final_answer": "LeBron James plays for the Los Angeles Lakers."}"#
                .to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent.answer("Who coaches LeBron?").await.unwrap();

        assert_eq!(outcome.steps.len(), 2);
        assert!(outcome.steps[0]
            .observation
            .contains("query generation failed"));
        assert!(outcome.output.contains("Lakers"));
    }

    #[tokio::test]
    async fn unparseable_decision_consumes_an_iteration() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            "The answer is probably the Lakers.".to_string(),
            r#"{"thought": "", "final_answer": "I cannot answer that."}"#.to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let outcome = agent.answer("What team does LeBron James play for?").await.unwrap();

        assert_eq!(outcome.steps.len(), 1);
        assert!(outcome.steps[0].observation.contains("Could not parse"));
    }

    #[tokio::test]
    async fn budget_exhaustion_terminates_with_full_trace() {
        let step =
            r#"{"thought": "", "tool": "calculator", "tool_input": "1 + 1"}"#.to_string();
        let llm = Arc::new(ScriptedLlm::new(vec![step; 20]));
        let schema = Arc::new(GraphSchema::nba());
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(Calculator));
        let agent = Agent::new(llm, tools, schema, 3);

        let outcome = agent.answer("loop forever").await.unwrap();

        assert_eq!(outcome.output, BUDGET_EXCEEDED_MESSAGE);
        assert_eq!(outcome.steps.len(), 3);
        assert!(outcome.steps.iter().all(|s| s.observation == "2"));
    }

    #[tokio::test]
    async fn generation_failure_is_an_observation_then_the_next_step_aborts() {
        // The script covers only the first decision. The graph tool's
        // generation call then finds the model gone: that failure is
        // absorbed as an observation, and the request aborts on the next
        // reasoning step, which needs the model itself.
        let llm = Arc::new(ScriptedLlm::new(vec![
            r#"{"thought": "", "tool": "graph_query", "tool_input": "LeBron's team"}"#
                .to_string(),
        ]));
        let agent = agent_with(llm, FixtureStore::new());

        let err = agent
            .answer("What team does LeBron James play for?")
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Upstream(_)));
    }

    #[tokio::test]
    async fn unreachable_model_aborts_the_request() {
        let agent = agent_with(Arc::new(DownLlm), FixtureStore::new());
        let err = agent.answer("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::Upstream(_)));
    }
}
