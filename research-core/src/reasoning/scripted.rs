//! Deterministic reasoner for tests and offline runs

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::{ConversationHistory, Reasoner};
use crate::error::{Result, ResearchError};
use crate::llm::ScriptedReply;
use crate::tools::ToolRegistry;

/// Reasoner that answers from a queue, then repeats a fallback.
///
/// An optional gate holds every invocation until a permit is available,
/// letting tests observe in-flight work.
pub struct ScriptedReasoner {
    replies: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    prompts: Mutex<Vec<(String, usize)>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedReasoner {
    pub fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<ScriptedReply>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            fallback: ScriptedReply::Error("scripted reasoner exhausted".to_string()),
            prompts: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Reply used once the queue is empty.
    pub fn with_fallback(mut self, fallback: impl Into<ScriptedReply>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Wait for (and consume) a permit from `gate` before each answer.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Prompts received so far, each with the history length it saw.
    pub fn prompts(&self) -> Vec<(String, usize)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of invocations so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Reasoner for ScriptedReasoner {
    async fn invoke(
        &self,
        prompt: &str,
        _tools: &ToolRegistry,
        history: &ConversationHistory,
    ) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((prompt.to_string(), history.len()));
        }

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| ResearchError::Other("scripted reasoner gate closed".to_string()))?;
            permit.forget();
        }

        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Error(message) => Err(ResearchError::Provider(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let reasoner = ScriptedReasoner::new(["one"]).with_fallback("more");
        let tools = ToolRegistry::new();
        let mut history = ConversationHistory::new();

        assert_eq!(reasoner.invoke("a", &tools, &history).await.unwrap(), "one");
        history.record("a", "one");
        assert_eq!(reasoner.invoke("b", &tools, &history).await.unwrap(), "more");
        assert_eq!(reasoner.prompts(), vec![("a".to_string(), 0), ("b".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_gate_holds_invocation() {
        let gate = Arc::new(Semaphore::new(0));
        let reasoner = Arc::new(ScriptedReasoner::new(["done"]).with_gate(gate.clone()));

        let task = {
            let reasoner = reasoner.clone();
            tokio::spawn(async move {
                reasoner
                    .invoke("q", &ToolRegistry::new(), &ConversationHistory::new())
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!task.is_finished());

        gate.add_permits(1);
        assert_eq!(task.await.unwrap().unwrap(), "done");
    }
}
