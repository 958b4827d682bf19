//! Tools the reasoning loop can invoke, and the registry that owns them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ToolError;

mod calculator;
mod graph_query;

pub use calculator::Calculator;
pub use graph_query::GraphQueryTool;

/// A callable capability.
///
/// `description` is natural-language text consumed by the model's tool
/// selection step; it is never executed. `invoke` takes the model-supplied
/// input text and returns observation text or a tool-level error.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn invoke(&self, input: &str) -> Result<String, ToolError>;
}

/// Fixed name-to-tool mapping built once at startup.
///
/// Lookups are case-sensitive exact matches; an unknown name is a
/// [`ToolError::NotFound`], which the loop turns into an observation
/// rather than a crash.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Tool descriptors for prompt construction, in stable name order.
    pub fn descriptors(&self) -> Vec<(&str, &str)> {
        self.tools
            .values()
            .map(|t| (t.name(), t.description()))
            .collect()
    }

    pub async fn invoke(&self, name: &str, input: &str) -> Result<String, ToolError> {
        match self.tools.get(name) {
            Some(tool) => tool.invoke(input).await,
            None => Err(ToolError::NotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its input."
        }

        async fn invoke(&self, input: &str) -> Result<String, ToolError> {
            Ok(input.to_string())
        }
    }

    #[tokio::test]
    async fn lookup_is_exact_and_case_sensitive() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));

        assert_eq!(registry.invoke("echo", "hi").await.unwrap(), "hi");
        assert!(matches!(
            registry.invoke("Echo", "hi").await,
            Err(ToolError::NotFound(name)) if name == "Echo"
        ));
    }

    #[tokio::test]
    async fn descriptors_are_name_ordered() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        let descriptors = registry.descriptors();
        assert_eq!(descriptors, vec![("echo", "Echoes its input.")]);
    }
}
