//! ReAct format parser
//!
//! Parses the ReAct (Reasoning + Acting) format used by the reasoning loop.
//!
//! Format:
//! ```text
//! Thought: I need to search for information
//! Action: WebSearch
//! Action Input: {"query": "solar panel recycling"}
//! Observation: search results
//! Thought: Now I know the answer
//! Final Answer: Most panels can be recycled.
//! ```

use regex::Regex;
use once_cell::sync::Lazy;

use super::parser::{OutputParser, ParseError, ParseResult};

/// Type of ReAct step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReActStepType {
    /// Reasoning step
    Thought,
    /// Action to take
    Action,
    /// Input for the action
    ActionInput,
    /// Result of action
    Observation,
    /// Final answer
    FinalAnswer,
}

impl ReActStepType {
    /// Check if this is a terminal step
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReActStepType::FinalAnswer)
    }
}

/// A single step in a ReAct trace
#[derive(Debug, Clone)]
pub struct ReActStep {
    /// Step type
    pub step_type: ReActStepType,
    /// Step content
    pub content: String,
}

impl ReActStep {
    /// Create a new ReAct step
    pub fn new(step_type: ReActStepType, content: impl Into<String>) -> Self {
        Self {
            step_type,
            content: content.into(),
        }
    }
}

/// What the model asked for in one completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReActDecision {
    /// Run a tool with the raw action input
    Action { tool: String, input: String },
    /// Stop with this answer
    FinalAnswer(String),
}

/// ReAct format parser
#[derive(Debug, Clone, Default)]
pub struct ReActParser;

static STEP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(Thought|Action\s*Input|Action|Observation|Final\s*Answer)\s*:\s*(.*)$")
        .unwrap()
});

impl ReActParser {
    /// Create a new ReAct parser
    pub fn new() -> Self {
        Self
    }

    /// Decide the next move from one model completion.
    ///
    /// The first complete Action/Action Input pair wins; anything the model
    /// wrote after a hallucinated `Observation:` is ignored. A Final Answer
    /// counts only if no action precedes it. An action named `Final Answer`
    /// is treated as a final answer carrying its input.
    pub fn decide(&self, raw: &str) -> ParseResult<ReActDecision> {
        let steps = self.parse(raw)?;

        let mut action: Option<String> = None;
        let mut input: Option<String> = None;

        for step in steps {
            match step.step_type {
                ReActStepType::Thought => {}
                ReActStepType::Action => {
                    if action.is_some() && input.is_some() {
                        break;
                    }
                    action = Some(step.content);
                    input = None;
                }
                ReActStepType::ActionInput => {
                    if action.is_some() && input.is_none() {
                        input = Some(step.content);
                    }
                }
                ReActStepType::Observation => {
                    if action.is_some() {
                        break;
                    }
                }
                ReActStepType::FinalAnswer => {
                    if action.is_none() {
                        return Ok(ReActDecision::FinalAnswer(step.content));
                    }
                    break;
                }
            }
        }

        match (action, input) {
            (Some(tool), Some(input)) if is_final_answer_action(&tool) => {
                Ok(ReActDecision::FinalAnswer(unquote(&input).to_string()))
            }
            (Some(tool), Some(input)) => Ok(ReActDecision::Action {
                tool: clean_tool_name(&tool),
                input,
            }),
            (Some(_), None) => Err(ParseError::MissingField("Action Input".to_string())),
            (None, _) => Err(ParseError::InvalidFormat(
                "No Action or Final Answer found".to_string(),
            )),
        }
    }
}

fn is_final_answer_action(tool: &str) -> bool {
    let normalized: String = tool
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    normalized == "finalanswer"
}

fn clean_tool_name(tool: &str) -> String {
    tool.trim()
        .trim_matches(|c| c == '`' || c == '"' || c == '\'' || c == '*')
        .trim()
        .to_string()
}

/// Strip one pair of matching outer quotes or backticks.
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\'', '`'] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

impl OutputParser for ReActParser {
    type Output = Vec<ReActStep>;

    fn parse(&self, raw: &str) -> ParseResult<Self::Output> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut steps = Vec::new();
        let mut current_type: Option<ReActStepType> = None;
        let mut current_content = String::new();

        for line in raw.lines() {
            if let Some(caps) = STEP_RE.captures(line) {
                let (Some(kind), Some(body)) = (caps.get(1), caps.get(2)) else {
                    continue;
                };

                if let Some(step_type) = current_type.take() {
                    steps.push(ReActStep::new(step_type, current_content.trim()));
                    current_content.clear();
                }

                let kind = kind.as_str().to_lowercase();
                let step_type = match kind.as_str() {
                    "thought" => ReActStepType::Thought,
                    "action" => ReActStepType::Action,
                    "observation" => ReActStepType::Observation,
                    s if s.contains("input") => ReActStepType::ActionInput,
                    _ => ReActStepType::FinalAnswer,
                };

                current_type = Some(step_type);
                current_content = body.as_str().to_string();
            } else if current_type.is_some() {
                // Continuation of previous step
                current_content.push('\n');
                current_content.push_str(line);
            }
        }

        if let Some(step_type) = current_type {
            steps.push(ReActStep::new(step_type, current_content.trim()));
        }

        if steps.is_empty() {
            return Err(ParseError::InvalidFormat("No ReAct steps found".to_string()));
        }

        Ok(steps)
    }

    fn can_parse(&self, raw: &str) -> bool {
        let lower = raw.to_lowercase();
        lower.contains("thought:") || lower.contains("action:") || lower.contains("final answer:")
    }

    fn name(&self) -> &'static str {
        "react"
    }
}
