//! Prompt templates for research, summarisation, and report synthesis

use once_cell::sync::Lazy;

/// A prompt with `{{variable}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Template name
    pub name: String,
    /// Template content with {{variable}} placeholders
    pub template: String,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Render the template with variable substitution.
    ///
    /// Substitution is a single left-to-right pass, so placeholder text
    /// inside a value is never expanded. Unknown placeholders are left as-is.
    pub fn render<'a>(&self, variables: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
        let variables: Vec<(&str, &str)> = variables.into_iter().collect();
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else { break };
            let name = after[..end].trim();

            result.push_str(&rest[..start]);
            match variables.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => result.push_str(value),
                None => result.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        result.push_str(rest);
        result
    }

    /// Names of the placeholders present in the template, in order of first use.
    pub fn variables(&self) -> Vec<String> {
        let mut found = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else { break };
            let name = after[..end].trim().to_string();
            if !name.is_empty() && !found.contains(&name) {
                found.push(name);
            }
            rest = &after[end + 2..];
        }
        found
    }
}

/// Per-question prompt handed to the reasoning delegate (`topic`, `query`)
pub static RESEARCH_PROMPT: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new(
        "research",
        r#"
You are a research assistant specialized in gathering and synthesizing information.
Your task is to help users with comprehensive research on various topics.

Guidelines:
1. Break down complex research questions into smaller sub-questions
2. Use multiple sources to verify information
3. Provide citations and sources when possible
4. Summarize key findings clearly
5. Identify knowledge gaps and suggest further research directions

Current research topic: {{topic}}
User query: {{query}}
"#,
    )
});

/// Prompt used by the summariser tool (`topic`, `findings`)
pub static SUMMARY_PROMPT: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new(
        "summary",
        r#"
Please provide a comprehensive summary of the following research findings:

Research Topic: {{topic}}
Findings: {{findings}}

Include:
1. Key insights and discoveries
2. Important statistics or data points
3. Controversial or debated aspects
4. Recommendations for further reading
5. Potential applications or implications
"#,
    )
});

/// Final report prompt (`topic`, `findings` as pretty JSON)
pub static REPORT_PROMPT: Lazy<PromptTemplate> = Lazy::new(|| {
    PromptTemplate::new(
        "report",
        r#"
Generate a comprehensive research report on the topic: {{topic}}

Research Findings:
{{findings}}

Please structure the report with:
1. Executive Summary
2. Key Findings
3. Methodology
4. Analysis
5. Conclusions
6. Recommendations
7. References

Make the report professional and well-structured.
Be concise but comprehensive.
"#,
    )
});

/// Render the per-question research prompt.
pub fn research_prompt(topic: &str, query: &str) -> String {
    RESEARCH_PROMPT.render([("topic", topic), ("query", query)])
}

/// Render the summariser prompt.
pub fn summary_prompt(topic: &str, findings: &str) -> String {
    SUMMARY_PROMPT.render([("topic", topic), ("findings", findings)])
}

/// Render the report prompt.
pub fn report_prompt(topic: &str, findings_json: &str) -> String {
    REPORT_PROMPT.render([("topic", topic), ("findings", findings_json)])
}
