//! The reasoning loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Ask the model for the next step, given the question, the graph
//!    schema, the tool descriptors, and the trace so far
//! 2. If it picks a tool, invoke it and record the observation
//! 3. Repeat until the model emits a final answer or the iteration
//!    budget is exhausted

mod agent_loop;
mod decision;
mod prompt;

pub use agent_loop::{Agent, AgentOutcome, AgentStep, BUDGET_EXCEEDED_MESSAGE};
pub use decision::{parse_decision, Decision};
