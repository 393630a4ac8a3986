//! Tool system for the reasoning loop
//!
//! Tools are registered in a [`ToolRegistry`] and invoked by name with JSON
//! arguments. The built-in set covers web search, academic search and
//! summarisation.
//!
//! # Example
//!
//! ```rust,no_run
//! use research_core::llm::ScriptedProvider;
//! use research_core::search::MockSearch;
//! use research_core::tools::research_tools;
//! use std::sync::Arc;
//!
//! let registry = research_tools(
//!     Arc::new(MockSearch::new()),
//!     Arc::new(ScriptedProvider::new(["summary"])),
//! );
//! assert_eq!(registry.len(), 3);
//! ```

mod builtin;
mod error;
mod registry;
mod tool;

pub use builtin::{AcademicSearchTool, ResearchSummarizerTool, WebSearchTool, research_tools};
pub use error::{ToolError, ToolErrorKind};
pub use registry::{RegistryError, ToolRegistry, ToolSummary};
pub use tool::{BoxedTool, Tool, ToolMetadata, ToolSchema, string_arg};
