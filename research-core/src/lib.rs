//! # Research Core
//!
//! Building blocks for a research agent that answers a list of questions on a
//! topic with a hosted model, then asks the same model for a structured
//! report:
//!
//! - Gemini text generation behind the [`llm::LLMProvider`] trait
//! - Network-free web and academic search tables
//! - A ReAct reasoning loop that calls search and summarisation tools
//! - Paced, failure-tolerant orchestration over a list of questions
//! - Background research jobs with bounded concurrency
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use research_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ResearchConfig::load()?;
//!     let agent = ResearchAgent::from_config(&config)?;
//!
//!     let questions = vec!["What are the environmental benefits of solar energy?".to_string()];
//!     let findings = agent.conduct_research("Solar Energy", &questions).await;
//!     let report = agent.generate_report(&findings, "Solar Energy").await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod llm;
pub mod parsing;
pub mod prompts;
pub mod reasoning;
pub mod research;
pub mod search;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{
        AgentSettings, JobIdStrategy, LlmSettings, PacingConfig, ResearchConfig, ServerConfig,
    };
    pub use crate::error::{Result, ResearchError};
    pub use crate::jobs::{
        AgentFactory, Clock, FixedClock, InMemoryJobStore, JobReport, JobRunner, JobStatus,
        JobStore, JobSummary, ResearchJob, ResearchSubmission, SystemClock,
    };
    pub use crate::llm::{
        GeminiModel, GeminiProvider, LLMConfig, LLMProvider, LLMRequest, LLMResponse, Message,
        MessageRole, ScriptedProvider, ScriptedReply,
    };
    pub use crate::parsing::{OutputParser, ParseError, ReActDecision, ReActParser};
    pub use crate::prompts::PromptTemplate;
    pub use crate::reasoning::{ConversationHistory, ReActAgent, Reasoner, ScriptedReasoner};
    pub use crate::research::{
        Findings, Pacer, PacingPolicy, PauseReason, RecordingPacer, ResearchAgent,
        ResearchOutcome, TokioPacer,
    };
    pub use crate::search::{AcademicRecord, MockSearch, SearchProvider, WebRecord};
    pub use crate::tools::{Tool, ToolError, ToolMetadata, ToolRegistry, ToolSchema};
}
