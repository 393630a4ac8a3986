//! Tool trait and metadata definitions
//!
//! Tools are what the reasoning loop can call between thoughts. Each tool
//! declares a name, a description the model reads, and a JSON schema for its
//! arguments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::error::ToolError;

/// Tool metadata for LLM-friendly discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Tool name (unique identifier)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// When should the LLM use this tool?
    pub usage_hints: Vec<String>,

    /// What the tool returns
    pub returns: String,
}

impl ToolMetadata {
    /// Create new metadata with required fields
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage_hints: Vec::new(),
            returns: "Tool-specific result".to_string(),
        }
    }

    /// Add a usage hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.usage_hints.push(hint.into());
        self
    }

    /// Set return description
    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = returns.into();
        self
    }
}

/// JSON Schema for tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// JSON Schema for input parameters
    pub parameters: Value,
}

impl ToolSchema {
    /// Create a schema from a JSON Schema value
    pub fn new(parameters: Value) -> Self {
        Self { parameters }
    }

    /// Schema for a tool taking only string arguments, all required
    pub fn strings(names: &[&str]) -> Self {
        let properties: serde_json::Map<String, Value> = names
            .iter()
            .map(|n| (n.to_string(), serde_json::json!({ "type": "string" })))
            .collect();
        Self::new(serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": names,
        }))
    }

    /// Names listed under `required`, in declaration order
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Argument that receives a bare (non-JSON) action input
    pub fn primary_argument(&self) -> Option<&str> {
        self.required().into_iter().next()
    }

    /// Compact `{"name": "type"}` rendering for prompts
    pub fn describe_arguments(&self) -> String {
        let Some(properties) = self.parameters.get("properties").and_then(Value::as_object) else {
            return "{}".to_string();
        };
        let args: Vec<String> = properties
            .iter()
            .map(|(name, spec)| {
                let ty = spec.get("type").and_then(Value::as_str).unwrap_or("any");
                format!("\"{}\": \"{}\"", name, ty)
            })
            .collect();
        format!("{{{}}}", args.join(", "))
    }
}

/// Core tool trait
///
/// Implement this trait to create a tool that the reasoning loop can use.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata
    fn metadata(&self) -> &ToolMetadata;

    /// Get tool name (convenience method)
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Get tool description (convenience method)
    fn description(&self) -> &str {
        &self.metadata().description
    }

    /// Get the JSON schema for this tool's parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, args: Value) -> Result<Value, ToolError>;
}

/// Type alias for shared tools
pub type BoxedTool = Arc<dyn Tool>;

/// Fetch a required string argument.
pub fn string_arg<'a>(args: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::validation(format!("missing string argument '{}'", name)))
}
