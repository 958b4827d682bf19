//! # Courtside
//!
//! A graph-grounded question answering agent for NBA teams and players.
//!
//! This library provides:
//! - An HTTP API that answers natural-language questions
//! - A tool-based reasoning loop that decides, per question, whether to
//!   query the graph store or run a calculation
//! - A Cypher-generating graph query tool backed by Neo4j
//! - An evaluation harness that scores answers against a golden set
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a question via the API
//! 2. Ask the language model for the next step, given the graph schema,
//!    the tool descriptors, and the trace so far
//! 3. If it picks a tool, invoke it and feed the observation back
//! 4. Repeat until a final answer or the iteration budget is reached
//!
//! ## Example
//!
//! ```rust,ignore
//! use courtside::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(llm, tools, schema, config.max_iterations);
//! let outcome = agent.answer("What team does LeBron James play for?").await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod eval;
pub mod graph;
pub mod llm;
pub mod tools;

pub use config::Config;

#[cfg(test)]
pub(crate) mod testing;
