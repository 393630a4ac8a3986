//! Text ReAct loop over an [`LLMProvider`]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use super::{ConversationHistory, Reasoner};
use crate::error::Result;
use crate::llm::{LLMProvider, LLMRequest, Message};
use crate::parsing::{ReActDecision, ReActParser};
use crate::prompts::PromptTemplate;
use crate::tools::ToolRegistry;

/// Returned when the loop runs out of iterations or time
pub const ITERATION_LIMIT_MESSAGE: &str = "Agent stopped due to iteration limit or time limit.";

/// Observation fed back when a completion cannot be parsed
pub const INVALID_RESPONSE_OBSERVATION: &str = "Invalid or incomplete response";

const STOP_SEQUENCE: &str = "Observation:";

fn system_template() -> PromptTemplate {
    PromptTemplate::new(
        "react_system",
        r#"Respond to the human as helpfully and accurately as possible. You have access to the following tools:

{{tools}}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{tool_names}}]
Action Input: the input to the action, either plain text or a JSON object of arguments
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question"#,
    )
}

/// ReAct agent
///
/// Each iteration asks the model to continue the scratchpad, stopping before
/// it writes its own observation. Parsed actions run against the registry and
/// their output is appended as the next observation.
pub struct ReActAgent {
    llm: Arc<dyn LLMProvider>,
    parser: ReActParser,
    max_iterations: usize,
    time_limit: Option<Duration>,
}

impl ReActAgent {
    /// Create an agent with the default bound of 15 iterations
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self {
            llm,
            parser: ReActParser::new(),
            max_iterations: 15,
            time_limit: None,
        }
    }

    /// Maximum model round-trips per invocation
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Wall-clock bound per invocation
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    fn system_prompt(tools: &ToolRegistry) -> String {
        let descriptions = tools.render_descriptions();
        let names = tools.names().join(", ");
        system_template().render([("tools", descriptions.as_str()), ("tool_names", names.as_str())])
    }

    fn question_block(prompt: &str, history: &ConversationHistory) -> String {
        let mut block = String::from("Begin!\n\n");
        if !history.is_empty() {
            block.push_str("Previous conversation:\n");
            block.push_str(&history.render());
            block.push_str("\n\n");
        }
        block.push_str("Question: ");
        block.push_str(prompt.trim());
        block.push_str("\nThought:");
        block
    }

    async fn run_tool(&self, tools: &ToolRegistry, name: &str, raw_input: &str) -> String {
        let Some(tool) = tools.get(name) else {
            tracing::warn!(tool = name, "Model requested an unknown tool");
            return format!(
                "{} is not a valid tool, try one of [{}].",
                name,
                tools.names().join(", ")
            );
        };

        let schema = tool.schema();
        let args = tool_arguments(raw_input, schema.primary_argument());

        tracing::info!(tool = name, "Running tool");
        match tool.execute(args).await {
            Ok(Value::String(text)) => text,
            Ok(other) => other.to_string(),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool failed");
                format!("Tool error: {}", e.message)
            }
        }
    }
}

/// Turn an Action Input into tool arguments.
///
/// JSON objects pass through; anything else becomes the value of the tool's
/// primary argument.
fn tool_arguments(raw_input: &str, primary: Option<&str>) -> Value {
    let trimmed = strip_code_fence(raw_input.trim());

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Value::Object(map);
    }

    let text = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s,
        _ => crate::parsing::unquote(trimmed).to_string(),
    };

    let mut map = Map::new();
    if let Some(primary) = primary {
        map.insert(primary.to_string(), Value::String(text));
    }
    Value::Object(map)
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl Reasoner for ReActAgent {
    async fn invoke(
        &self,
        prompt: &str,
        tools: &ToolRegistry,
        history: &ConversationHistory,
    ) -> Result<String> {
        let system = Self::system_prompt(tools);
        let question = Self::question_block(prompt, history);
        let started = tokio::time::Instant::now();
        let mut scratchpad = String::new();

        for iteration in 1..=self.max_iterations {
            if let Some(limit) = self.time_limit {
                if started.elapsed() >= limit {
                    tracing::warn!(iteration, "Reasoning time limit reached");
                    break;
                }
            }

            let request = LLMRequest {
                messages: vec![
                    Message::system(system.clone()),
                    Message::user(format!("{}{}", question, scratchpad)),
                ],
                temperature: None,
                max_tokens: None,
                stop_sequences: vec![STOP_SEQUENCE.to_string()],
            };

            let completion = self.llm.generate_request(&request).await?.content;

            let observation = match self.parser.decide(&completion) {
                Ok(ReActDecision::FinalAnswer(answer)) => {
                    tracing::debug!(iteration, "Reasoner reached a final answer");
                    return Ok(answer);
                }
                Ok(ReActDecision::Action { tool, input }) => {
                    tracing::debug!(iteration, tool = %tool, "Reasoner chose an action");
                    self.run_tool(tools, &tool, &input).await
                }
                Err(e) => {
                    tracing::warn!(iteration, error = %e, "Unparseable model output");
                    INVALID_RESPONSE_OBSERVATION.to_string()
                }
            };

            let step = completion
                .split(STOP_SEQUENCE)
                .next()
                .unwrap_or_default()
                .trim();
            let step = step.strip_prefix("Thought:").map(str::trim_start).unwrap_or(step);
            scratchpad.push(' ');
            scratchpad.push_str(step);
            scratchpad.push_str("\nObservation: ");
            scratchpad.push_str(&observation);
            scratchpad.push_str("\nThought:");
        }

        tracing::warn!(max_iterations = self.max_iterations, "Reasoner stopped without an answer");
        Ok(ITERATION_LIMIT_MESSAGE.to_string())
    }
}
