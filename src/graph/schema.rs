//! Static graph schema descriptor.
//!
//! The schema is grounding context for query generation and the reference
//! the validator checks generated queries against. It is loaded once at
//! startup and never mutated.

/// A node label and its known property names.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    pub label: &'static str,
    pub properties: &'static [&'static str],
}

/// A relationship type with its endpoint labels.
#[derive(Debug, Clone)]
pub struct RelationshipSchema {
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

/// The shape of the graph: node labels, relationship types, properties.
#[derive(Debug, Clone)]
pub struct GraphSchema {
    nodes: Vec<NodeSchema>,
    relationships: Vec<RelationshipSchema>,
}

impl GraphSchema {
    /// The NBA schema produced by ingestion: players linked to their team.
    pub fn nba() -> Self {
        Self {
            nodes: vec![
                NodeSchema {
                    label: "Player",
                    properties: &[
                        "name",
                        "first_name",
                        "last_name",
                        "position",
                        "height",
                        "weight",
                        "jersey_number",
                    ],
                },
                NodeSchema {
                    label: "Team",
                    properties: &["name", "abbreviation", "city", "conference", "division"],
                },
            ],
            relationships: vec![RelationshipSchema {
                name: "PLAYS_FOR",
                from: "Player",
                to: "Team",
            }],
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.nodes.iter().any(|n| n.label == label)
    }

    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.iter().any(|r| r.name == name)
    }

    /// Render the schema as grounding text for prompts.
    pub fn grounding_text(&self) -> String {
        let mut out = String::from("Graph schema:\nNodes:\n");
        for node in &self.nodes {
            out.push_str(&format!(
                "  (:{} {{{}}})\n",
                node.label,
                node.properties.join(", ")
            ));
        }
        out.push_str("Relationships:\n");
        for rel in &self.relationships {
            out.push_str(&format!("  (:{})-[:{}]->(:{})\n", rel.from, rel.name, rel.to));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nba_schema_lookups() {
        let schema = GraphSchema::nba();
        assert!(schema.has_label("Player"));
        assert!(schema.has_label("Team"));
        assert!(!schema.has_label("Coach"));
        assert!(schema.has_relationship("PLAYS_FOR"));
        assert!(!schema.has_relationship("COACHES"));
    }

    #[test]
    fn grounding_text_mentions_everything() {
        let text = GraphSchema::nba().grounding_text();
        assert!(text.contains("(:Player"));
        assert!(text.contains("jersey_number"));
        assert!(text.contains("(:Player)-[:PLAYS_FOR]->(:Team)"));
    }
}
