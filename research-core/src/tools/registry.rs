//! Tool Registry for tool registration and lookup
//!
//! The `ToolRegistry` provides:
//! - Tool registration with duplicate detection
//! - Lookup by name
//! - Stable, registration-ordered listing
//! - Rendering of tool descriptions for the reasoning prompt

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use super::tool::Tool;

/// Error type for registry operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// Tool with this name already exists
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),
}

/// Summary of a tool for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,
}

impl From<&dyn Tool> for ToolSummary {
    fn from(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.schema().parameters,
        }
    }
}

/// Registry for managing tools
///
/// Tools keep the order they were registered in; that order is what the
/// model sees in its prompt.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    ///
    /// Returns an error if a tool with the same name is already registered.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Register multiple tools at once
    ///
    /// Fails if any tool name is duplicated.
    pub fn register_all(&mut self, tools: Vec<Arc<dyn Tool>>) -> Result<(), RegistryError> {
        for tool in tools {
            self.register(tool)?;
        }
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get all registered tools, in registration order
    pub fn all(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Get all tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tools with their summaries
    pub fn list(&self) -> Vec<ToolSummary> {
        self.tools
            .iter()
            .map(|t| ToolSummary::from(t.as_ref()))
            .collect()
    }

    /// One line per tool: `name: description, args: {...}`
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| {
                format!(
                    "{}: {}, args: {}",
                    t.name(),
                    t.description(),
                    t.schema().describe_arguments()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolError, ToolMetadata, ToolSchema};
    use async_trait::async_trait;
    use serde_json::Value;

    struct NamedTool {
        metadata: ToolMetadata,
    }

    impl NamedTool {
        fn new(name: &str, description: &str) -> Self {
            Self {
                metadata: ToolMetadata::new(name, description),
            }
        }
    }

    #[async_trait]
    impl Tool for NamedTool {
        fn metadata(&self) -> &ToolMetadata {
            &self.metadata
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::strings(&["query"])
        }

        async fn execute(&self, args: Value) -> Result<Value, ToolError> {
            Ok(args)
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(NamedTool::new("search", "Search the web")))
            .unwrap();

        assert!(registry.contains("search"));
        assert_eq!(registry.get("search").unwrap().description(), "Search the web");
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(NamedTool::new("search", "one")))
            .unwrap();
        let err = registry
            .register(Arc::new(NamedTool::new("search", "two")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Tool 'search' is already registered");
        assert_eq!(registry.get("search").unwrap().description(), "one");
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = ToolRegistry::new();
        registry
            .register_all(vec![
                Arc::new(NamedTool::new("zeta", "last alphabetically")),
                Arc::new(NamedTool::new("alpha", "first alphabetically")),
            ])
            .unwrap();

        assert_eq!(registry.names(), vec!["zeta", "alpha"]);
        assert_eq!(registry.list()[1].name, "alpha");

        let rendered = registry.render_descriptions();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("zeta: last alphabetically, args: {\"query\": \"string\"}"));
    }
}
