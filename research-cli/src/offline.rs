//! Network-free model used by `--offline`
//!
//! Plays the ReAct loop deterministically: the first step searches the web
//! for the user query, the next step answers from the observed titles. The
//! report prompt gets a seven-section report built from the findings.

use async_trait::async_trait;
use research_core::error::Result;
use research_core::llm::{LLMProvider, LLMRequest, LLMResponse, ModelInfo};
use research_core::research::Findings;
use serde_json::Value;

const SECTIONS: [&str; 7] = [
    "Executive Summary",
    "Key Findings",
    "Methodology",
    "Analysis",
    "Conclusions",
    "Recommendations",
    "References",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

impl OfflineProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LLMProvider for OfflineProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let prompt = request.flattened();
        let content = if request.stop_sequences.iter().any(|s| s == "Observation:") {
            react_step(&prompt)
        } else if prompt.contains("Executive Summary") {
            canned_report(&prompt)
        } else {
            format!(
                "Summary: {}",
                line_value(&prompt, "Findings: ").unwrap_or("no findings supplied")
            )
        };

        Ok(LLMResponse {
            content,
            usage: None,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "offline".to_string(),
            model_name: "offline".to_string(),
        }
    }
}

fn line_value<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let start = text.rfind(label)? + label.len();
    text[start..].lines().next().map(str::trim)
}

fn react_step(prompt: &str) -> String {
    // Only the current question block and its scratchpad matter.
    let current = prompt.rsplit_once("Question: ").map_or(prompt, |(_, q)| q);
    let query = line_value(current, "User query: ").unwrap_or("research topic");

    let Some((_, observed)) = current.rsplit_once("Observation: ") else {
        let input = serde_json::json!({ "query": query });
        return format!(
            "I should look for sources first.\nAction: WebSearch\nAction Input: {}",
            input
        );
    };

    let observed = observed.rsplit_once("\nThought:").map_or(observed, |(o, _)| o);
    let titles: Vec<String> = match serde_json::from_str::<Value>(observed.trim()) {
        Ok(Value::Array(records)) => records
            .iter()
            .filter_map(|r| r.get("title").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    if titles.is_empty() {
        format!("I now know the final answer\nFinal Answer: No sources were found for \"{}\".", query)
    } else {
        format!(
            "I now know the final answer\nFinal Answer: Offline findings for \"{}\" draw on: {}.",
            query,
            titles.join("; ")
        )
    }
}

fn canned_report(prompt: &str) -> String {
    let topic = prompt
        .split_once("on the topic: ")
        .and_then(|(_, rest)| rest.lines().next())
        .map_or("the topic", str::trim);
    let findings: Findings = prompt
        .split_once("Research Findings:")
        .and_then(|(_, rest)| rest.rsplit_once("\nPlease structure"))
        .and_then(|(json, _)| serde_json::from_str(json.trim()).ok())
        .unwrap_or_default();

    let mut out = String::new();
    for (n, section) in SECTIONS.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", n + 1, section));
        match *section {
            "Executive Summary" => out.push_str(&format!(
                "Offline report on {} covering {} question(s).\n",
                topic,
                findings.len()
            )),
            "Key Findings" => {
                for (question, answer) in findings.iter() {
                    out.push_str(&format!("- {}: {}\n", question, answer));
                }
            }
            "Methodology" => out.push_str("Answers were assembled from the built-in search tables.\n"),
            _ => out.push_str("Not available in offline mode.\n"),
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}
