//! Built-in research tools
//!
//! - `WebSearch`: web lookup through a [`SearchProvider`]
//! - `AcademicSearch`: paper lookup through a [`SearchProvider`]
//! - `ResearchSummarizer`: one model call over the summary prompt

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::error::ToolError;
use super::registry::ToolRegistry;
use super::tool::{Tool, ToolMetadata, ToolSchema, string_arg};
use crate::llm::{LLMConfig, LLMProvider};
use crate::prompts::summary_prompt;
use crate::search::{DEFAULT_ACADEMIC_RESULTS, DEFAULT_WEB_RESULTS, SearchProvider};

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_string_pretty(value)
        .map(Value::String)
        .map_err(|e| ToolError::internal(format!("failed to encode results: {}", e)))
}

/// Web search tool
pub struct WebSearchTool {
    metadata: ToolMetadata,
    search: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self {
            metadata: ToolMetadata::new("WebSearch", "Search the web for current information")
                .with_hint("Input should be a search query")
                .with_returns("JSON array of {title, url, snippet}"),
            search,
            max_results: DEFAULT_WEB_RESULTS,
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::strings(&["query"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let query = string_arg(&args, "query")?;
        to_pretty_json(&self.search.search_web(query, self.max_results))
    }
}

/// Academic search tool
pub struct AcademicSearchTool {
    metadata: ToolMetadata,
    search: Arc<dyn SearchProvider>,
    max_results: usize,
}

impl AcademicSearchTool {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self {
            metadata: ToolMetadata::new(
                "AcademicSearch",
                "Search academic sources for research papers",
            )
            .with_hint("Input should be a research topic")
            .with_returns("JSON array of {title, authors, summary, published, source, keywords}"),
            search,
            max_results: DEFAULT_ACADEMIC_RESULTS,
        }
    }
}

#[async_trait]
impl Tool for AcademicSearchTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::strings(&["query"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let query = string_arg(&args, "query")?;
        to_pretty_json(&self.search.search_academic(query, self.max_results))
    }
}

/// Summariser tool backed by the text-generation provider
pub struct ResearchSummarizerTool {
    metadata: ToolMetadata,
    llm: Arc<dyn LLMProvider>,
    config: LLMConfig,
}

impl ResearchSummarizerTool {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self {
            metadata: ToolMetadata::new(
                "ResearchSummarizer",
                "Summarize research findings into comprehensive reports.",
            )
            .with_hint("Input should be topic and findings")
            .with_returns("Summary text"),
            llm,
            config: LLMConfig::default(),
        }
    }
}

#[async_trait]
impl Tool for ResearchSummarizerTool {
    fn metadata(&self) -> &ToolMetadata {
        &self.metadata
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::strings(&["topic", "findings"])
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let topic = string_arg(&args, "topic")?;
        // Models sometimes hand over structured findings instead of text.
        let findings = match args.get("findings") {
            Some(Value::String(s)) => s.clone(),
            Some(other) if !other.is_null() => other.to_string(),
            _ => return Err(ToolError::validation("missing string argument 'findings'")),
        };

        let prompt = summary_prompt(topic, &findings);
        let summary = self
            .llm
            .generate(&prompt, &self.config)
            .await
            .map_err(|e| ToolError::upstream(e.to_string()))?;
        Ok(Value::String(summary))
    }
}

/// Registry holding the three research tools in their canonical order.
pub fn research_tools(
    search: Arc<dyn SearchProvider>,
    llm: Arc<dyn LLMProvider>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in [
        Arc::new(WebSearchTool::new(search.clone())) as Arc<dyn Tool>,
        Arc::new(AcademicSearchTool::new(search)),
        Arc::new(ResearchSummarizerTool::new(llm)),
    ] {
        // names are distinct constants
        if let Err(e) = registry.register(tool) {
            tracing::error!(error = %e, "Built-in tool registration failed");
        }
    }
    registry
}
