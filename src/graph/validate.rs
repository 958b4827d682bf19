//! Syntactic validation of generated Cypher.
//!
//! Generated queries are checked before they are ever sent to the store:
//! read-only clause set, balanced delimiters and quotes, and every label
//! and relationship type present in the schema descriptor. Anything that
//! fails here is a query-generation failure, not a store error.

use super::schema::GraphSchema;

const READ_CLAUSES: &[&str] = &["MATCH", "OPTIONAL", "WITH", "RETURN", "UNWIND"];

const WRITE_KEYWORDS: &[&str] = &[
    "CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE", "DROP", "CALL", "LOAD", "FOREACH",
];

/// Check that `query` is a well-formed, read-only Cypher statement that
/// references only labels and relationship types present in `schema`.
pub fn validate_cypher(query: &str, schema: &GraphSchema) -> Result<(), String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err("empty query".to_string());
    }

    let first = trimmed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();
    if !READ_CLAUSES.contains(&first.as_str()) {
        return Err(format!("query must start with a read clause, got '{}'", first));
    }

    let scan = scan(trimmed)?;

    for word in scan.bare_text.split(|c: char| !c.is_alphanumeric() && c != '_') {
        let upper = word.to_uppercase();
        if WRITE_KEYWORDS.contains(&upper.as_str()) {
            return Err(format!("write clause '{}' is not allowed", upper));
        }
    }

    for label in &scan.labels {
        if !schema.has_label(label) {
            return Err(format!("unknown node label ':{}'", label));
        }
    }
    for rel in &scan.relationships {
        if !schema.has_relationship(rel) {
            return Err(format!("unknown relationship type ':{}'", rel));
        }
    }

    Ok(())
}

struct Scan {
    /// Query text with string literals blanked out.
    bare_text: String,
    labels: Vec<String>,
    relationships: Vec<String>,
}

/// Single pass over the query: tracks quote state, checks delimiter
/// balance, and collects `:Label` / `[:REL_TYPE]` tokens.
fn scan(query: &str) -> Result<Scan, String> {
    let mut bare_text = String::with_capacity(query.len());
    let mut labels = Vec::new();
    let mut relationships = Vec::new();

    let mut stack: Vec<char> = Vec::new();
    let mut bracket_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let chars: Vec<char> = query.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            bare_text.push(' ');
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => {
                stack.push(c);
                if c == '[' {
                    bracket_depth += 1;
                }
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return Err(format!("unbalanced '{}'", c));
                }
                if c == ']' {
                    bracket_depth -= 1;
                }
            }
            ':' => {
                // A colon directly followed by an identifier introduces a
                // label (or, inside brackets, a relationship type). Property
                // map colons are followed by whitespace or a literal.
                let start = i + 1;
                let mut end = start;
                while end < chars.len()
                    && (chars[end].is_alphanumeric() || chars[end] == '_')
                {
                    end += 1;
                }
                if end > start && chars[start].is_alphabetic() {
                    let name: String = chars[start..end].iter().collect();
                    if bracket_depth > 0 {
                        relationships.push(name);
                    } else {
                        labels.push(name);
                    }
                    for _ in start..end {
                        bare_text.push(' ');
                    }
                    bare_text.push(':');
                    i = end;
                    continue;
                }
            }
            _ => {}
        }

        bare_text.push(c);
        i += 1;
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed '{}'", open));
    }

    Ok(Scan {
        bare_text,
        labels,
        relationships,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphSchema;

    fn schema() -> GraphSchema {
        GraphSchema::nba()
    }

    #[test]
    fn accepts_schema_conforming_query() {
        let q = "MATCH (p:Player)-[:PLAYS_FOR]->(t:Team) \
                 WHERE toLower(p.name) = 'lebron james' RETURN t.name";
        assert!(validate_cypher(q, &schema()).is_ok());
    }

    #[test]
    fn accepts_optional_match_and_property_maps() {
        let q = "MATCH (p:Player {name: 'Luka Doncic'}) \
                 OPTIONAL MATCH (p)-[:PLAYS_FOR]->(t:Team) \
                 RETURN p.jersey_number, t.name";
        assert!(validate_cypher(q, &schema()).is_ok());
    }

    #[test]
    fn rejects_empty_query() {
        assert!(validate_cypher("   ", &schema()).is_err());
    }

    #[test]
    fn rejects_write_clauses() {
        let err = validate_cypher("MATCH (p:Player) DELETE p", &schema()).unwrap_err();
        assert!(err.contains("DELETE"));
        assert!(validate_cypher("CREATE (p:Player) RETURN p", &schema()).is_err());
    }

    #[test]
    fn rejects_unknown_label() {
        let err = validate_cypher("MATCH (c:Coach) RETURN c.name", &schema()).unwrap_err();
        assert!(err.contains("Coach"));
    }

    #[test]
    fn rejects_unknown_relationship() {
        let q = "MATCH (p:Player)-[:COACHED_BY]->(t:Team) RETURN t.name";
        let err = validate_cypher(q, &schema()).unwrap_err();
        assert!(err.contains("COACHED_BY"));
    }

    #[test]
    fn rejects_unbalanced_delimiters() {
        assert!(validate_cypher("MATCH (p:Player RETURN p.name", &schema()).is_err());
        assert!(validate_cypher("MATCH (p:Player)-[:PLAYS_FOR->(t:Team) RETURN t", &schema())
            .is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(validate_cypher("MATCH (p:Player) WHERE p.name = 'LeBron RETURN p", &schema())
            .is_err());
    }

    #[test]
    fn ignores_keywords_inside_strings() {
        let q = "MATCH (t:Team) WHERE t.name = 'Delete City' RETURN t.name";
        assert!(validate_cypher(q, &schema()).is_ok());
    }

    #[test]
    fn rejects_non_read_start() {
        assert!(validate_cypher("RETURN 1", &schema()).is_ok());
        assert!(validate_cypher("MERGE (p:Player) RETURN p", &schema()).is_err());
    }
}
