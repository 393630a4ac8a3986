//! Conversation memory for one research run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed exchange: the prompt handed to the reasoner and its answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Turn index (0-indexed)
    pub index: usize,
    /// Prompt sent to the reasoner
    pub input: String,
    /// Final answer it produced
    pub output: String,
    /// When the exchange was recorded
    pub recorded_at: DateTime<Utc>,
}

impl Turn {
    /// Estimate token count (rough approximation: 4 chars per token)
    pub fn estimate_tokens(&self) -> usize {
        (self.input.len() + self.output.len()) / 4
    }

    fn render(&self) -> String {
        format!("Human: {}\nAI: {}", self.input.trim(), self.output.trim())
    }
}

/// Ordered buffer of prior exchanges.
///
/// Rendering keeps the most recent turns that fit the token budget, always
/// including at least the last one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
    max_tokens: Option<usize>,
}

impl ConversationHistory {
    /// Create an empty, unbounded history
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            max_tokens: None,
        }
    }

    /// Cap the rendered history at roughly this many tokens
    pub fn with_token_budget(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Record a completed exchange
    pub fn record(&mut self, input: impl Into<String>, output: impl Into<String>) -> usize {
        let index = self.turns.len();
        self.turns.push(Turn {
            index,
            input: input.into(),
            output: output.into(),
            recorded_at: Utc::now(),
        });
        index
    }

    /// Get all turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get turn count
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Estimate total token count
    pub fn estimate_tokens(&self) -> usize {
        self.turns.iter().map(Turn::estimate_tokens).sum()
    }

    /// Turns that fit the budget, oldest first
    pub fn window(&self) -> &[Turn] {
        let Some(max_tokens) = self.max_tokens else {
            return &self.turns;
        };

        let max_start = self.turns.len().saturating_sub(1);
        let mut start = 0;
        while start < max_start {
            let tokens: usize = self.turns[start..].iter().map(Turn::estimate_tokens).sum();
            if tokens <= max_tokens {
                break;
            }
            start += 1;
        }
        &self.turns[start..]
    }

    /// `Human:`/`AI:` transcript of the windowed turns, empty when no turns
    pub fn render(&self) -> String {
        self.window()
            .iter()
            .map(Turn::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
