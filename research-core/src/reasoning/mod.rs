//! Reasoning delegates
//!
//! A [`Reasoner`] takes one prompt plus the available tools and returns a
//! final textual answer, calling tools as many times as it needs to.
//! [`ReActAgent`] drives a hosted model through the Thought / Action /
//! Observation loop; [`ScriptedReasoner`] returns canned answers for tests.

mod history;
mod react;
mod scripted;

use async_trait::async_trait;

use crate::error::Result;
use crate::tools::ToolRegistry;

pub use history::{ConversationHistory, Turn};
pub use react::{INVALID_RESPONSE_OBSERVATION, ITERATION_LIMIT_MESSAGE, ReActAgent};
pub use scripted::ScriptedReasoner;

/// Multi-step, tool-augmented text generation.
#[async_trait]
pub trait Reasoner: Send + Sync {
    /// Produce a final answer for `prompt`.
    ///
    /// # Errors
    ///
    /// Failures of the underlying model propagate; tool failures do not.
    async fn invoke(
        &self,
        prompt: &str,
        tools: &ToolRegistry,
        history: &ConversationHistory,
    ) -> Result<String>;
}
