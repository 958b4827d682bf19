//! Decision prompt construction for the reasoning loop.

use crate::graph::GraphSchema;
use crate::tools::ToolRegistry;

use super::agent_loop::AgentStep;

/// Build the system instruction: role, schema grounding, tool descriptors,
/// and the decision JSON format.
pub fn build_system_prompt(schema: &GraphSchema, tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .descriptors()
        .iter()
        .map(|(name, description)| format!("- **{}**: {}", name, description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a question answering agent for NBA teams and players.

{schema}
## Your Tools

{tool_descriptions}

## How to Respond

Work one step at a time. Reply with a single JSON object and nothing else.

To use a tool:
{{"thought": "<why this step>", "tool": "<tool name>", "tool_input": "<input text>"}}

To answer the user:
{{"thought": "<why you are done>", "final_answer": "<answer>"}}

## Rules

1. Base every factual claim on a tool observation. Do not answer from memory.
2. Use the calculator for any arithmetic instead of computing yourself.
3. If an observation reports a tool failure, adjust the input and retry, or
   try a different tool.
4. If the data does not contain the answer, say that you cannot answer."#,
        schema = schema.grounding_text(),
        tool_descriptions = tool_descriptions
    )
}

/// Build the user message: the question plus the rendered trace so far.
pub fn build_user_prompt(question: &str, steps: &[AgentStep]) -> String {
    let mut prompt = format!("Question: {}", question);
    if steps.is_empty() {
        return prompt;
    }

    prompt.push_str("\n\nSteps taken so far:");
    for (i, step) in steps.iter().enumerate() {
        prompt.push_str(&format!(
            "\n{}. tool: {}\n   input: {}\n   observation: {}",
            i + 1,
            if step.tool.is_empty() {
                "(none)"
            } else {
                step.tool.as_str()
            },
            step.tool_input,
            step.observation
        ));
    }
    prompt
}
