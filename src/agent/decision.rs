//! Parsing of the model's per-step decision.
//!
//! Each reasoning step must reply with a single JSON object: either a tool
//! selection `{"thought", "tool", "tool_input"}` or a final answer
//! `{"thought", "final_answer"}`. Anything else is a parse failure the
//! loop feeds back as an observation so the model can correct itself.

use serde::Deserialize;

/// One decision emitted by the reasoning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    UseTool {
        thought: String,
        tool: String,
        tool_input: String,
    },
    Final {
        thought: String,
        answer: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    thought: String,
    tool: Option<String>,
    tool_input: Option<String>,
    final_answer: Option<String>,
}

/// Parse a model reply into a [`Decision`].
///
/// Tolerates surrounding prose and markdown fences by extracting the
/// outermost `{...}` span before deserializing.
pub fn parse_decision(raw: &str) -> Result<Decision, String> {
    let start = raw
        .find('{')
        .ok_or_else(|| "no JSON object in reply".to_string())?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| "no JSON object in reply".to_string())?;
    if end < start {
        return Err("no JSON object in reply".to_string());
    }

    let parsed: RawDecision = serde_json::from_str(&raw[start..=end])
        .map_err(|e| format!("invalid JSON: {}", e))?;

    if let Some(answer) = parsed.final_answer {
        return Ok(Decision::Final {
            thought: parsed.thought,
            answer,
        });
    }
    if let Some(tool) = parsed.tool {
        return Ok(Decision::UseTool {
            thought: parsed.thought,
            tool,
            tool_input: parsed.tool_input.unwrap_or_default(),
        });
    }
    Err("decision names neither a tool nor a final answer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tool_selection() {
        let raw = r#"{"thought": "need a lookup", "tool": "graph_query", "tool_input": "LeBron's team"}"#;
        assert_eq!(
            parse_decision(raw).unwrap(),
            Decision::UseTool {
                thought: "need a lookup".to_string(),
                tool: "graph_query".to_string(),
                tool_input: "LeBron's team".to_string(),
            }
        );
    }

    #[test]
    fn parses_final_answer() {
        let raw = r#"{"thought": "done", "final_answer": "LeBron James plays for the Lakers."}"#;
        assert_eq!(
            parse_decision(raw).unwrap(),
            Decision::Final {
                thought: "done".to_string(),
                answer: "LeBron James plays for the Lakers.".to_string(),
            }
        );
    }

    #[test]
    fn final_answer_wins_over_tool_if_both_present() {
        let raw = r#"{"tool": "calculator", "final_answer": "42"}"#;
        assert!(matches!(parse_decision(raw), Ok(Decision::Final { .. })));
    }

    #[test]
    fn tolerates_fences_and_prose() {
        let raw = "Here is my decision:\n```json\n{\"thought\": \"\", \"tool\": \"calculator\", \"tool_input\": \"1+1\"}\n```";
        assert!(matches!(parse_decision(raw), Ok(Decision::UseTool { .. })));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_decision("I think the answer is 42").is_err());
        assert!(parse_decision("{not json}").is_err());
        assert!(parse_decision(r#"{"thought": "hmm"}"#).is_err());
    }
}
