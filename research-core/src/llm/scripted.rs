//! Scripted provider that replays canned replies
//!
//! Used by the offline CLI mode and by tests that need deterministic model
//! output without network access.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{Result, ResearchError};
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, ModelInfo, TokenUsage};

/// One queued reply
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Successful completion text
    Text(String),
    /// Provider failure with this message
    Error(String),
}

impl From<&str> for ScriptedReply {
    fn from(s: &str) -> Self {
        ScriptedReply::Text(s.to_string())
    }
}

impl From<String> for ScriptedReply {
    fn from(s: String) -> Self {
        ScriptedReply::Text(s)
    }
}

/// Provider that pops replies from a queue, then repeats a fallback.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedProvider {
    /// Queue the given replies in order.
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: ScriptedReply::Error("scripted provider exhausted".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply used once the queue is empty.
    pub fn with_fallback(mut self, fallback: impl Into<ScriptedReply>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn next_reply(&self) -> ScriptedReply {
        self.replies
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(request.clone());
        }

        match self.next_reply() {
            ScriptedReply::Text(content) => {
                let prompt_tokens = request.flattened().split_whitespace().count();
                let completion_tokens = content.split_whitespace().count();
                Ok(LLMResponse {
                    content,
                    usage: Some(TokenUsage {
                        prompt_tokens,
                        completion_tokens,
                        total_tokens: prompt_tokens + completion_tokens,
                    }),
                })
            }
            ScriptedReply::Error(message) => Err(ResearchError::Provider(message)),
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "scripted".to_string(),
        }
    }
}
