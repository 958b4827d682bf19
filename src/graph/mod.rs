//! Graph store collaborator: schema metadata, query validation, and the
//! Neo4j HTTP transaction API client.

mod schema;
mod store;
mod validate;

pub use schema::GraphSchema;
pub use store::{format_rows, GraphStore, Neo4jHttpStore, ResultSet, NO_RESULTS};
pub use validate::validate_cypher;
