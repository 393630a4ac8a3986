//! Research orchestration and report synthesis

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::findings::Findings;
use super::pacing::{Pacer, PacingPolicy, PauseReason, TokioPacer};
use crate::config::ResearchConfig;
use crate::error::{Result, ResearchError};
use crate::llm::{GeminiProvider, LLMConfig, LLMProvider};
use crate::prompts::{report_prompt, research_prompt};
use crate::reasoning::{ConversationHistory, ReActAgent, Reasoner};
use crate::search::{MockSearch, SearchProvider};
use crate::tools::{ToolRegistry, research_tools};

/// Findings plus the report synthesised from them
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    pub findings: Findings,
    pub report: String,
}

/// Runs research questions through a reasoner and writes the report.
///
/// The agent keeps a conversation history across calls, so questions asked
/// later can refer back to earlier answers.
pub struct ResearchAgent {
    llm: Arc<dyn LLMProvider>,
    reasoner: Arc<dyn Reasoner>,
    tools: ToolRegistry,
    pacing: PacingPolicy,
    pacer: Arc<dyn Pacer>,
    history: Mutex<ConversationHistory>,
    report_config: LLMConfig,
}

impl std::fmt::Debug for ResearchAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAgent")
            .field("model", &self.llm.model_info().model_name)
            .field("tools", &self.tools.names())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl ResearchAgent {
    pub fn builder() -> ResearchAgentBuilder {
        ResearchAgentBuilder::default()
    }

    /// Agent backed by Gemini, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        config.validate()?;
        let llm: Arc<dyn LLMProvider> = Arc::new(GeminiProvider::from_settings(&config.llm)?);

        let mut builder = Self::builder()
            .llm(llm)
            .pacing(PacingPolicy::from(&config.pacing))
            .max_iterations(config.agent.max_iterations);
        if let Some(limit) = config.agent.time_limit {
            builder = builder.time_limit(limit);
        }
        builder.build()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn pacing(&self) -> PacingPolicy {
        self.pacing
    }

    /// Snapshot of the conversation so far
    pub async fn history(&self) -> ConversationHistory {
        self.history.lock().await.clone()
    }

    /// Research each question in order.
    ///
    /// Never fails: a question whose reasoning fails gets the answer
    /// `Research failed: <error>`. Successful questions are followed by the
    /// inter-question delay unless they are last; rate-limit failures are
    /// followed by the cooldown.
    pub async fn conduct_research(&self, topic: &str, questions: &[String]) -> Findings {
        let mut findings = Findings::new();
        let total = questions.len();
        let mut history = self.history.lock().await;

        for (index, question) in questions.iter().enumerate() {
            let prompt = research_prompt(topic, question);
            tracing::info!(
                question = %question,
                position = index + 1,
                total,
                "Researching question"
            );

            match self.reasoner.invoke(&prompt, &self.tools, &history).await {
                Ok(answer) => {
                    history.record(prompt, answer.clone());
                    findings.insert(question.clone(), answer);

                    if let Some(delay) = self.pacing.after_success(index, total) {
                        self.pacer.pause(delay, PauseReason::BetweenQuestions).await;
                    }
                }
                Err(e) => {
                    tracing::error!(question = %question, error = %e, "Research question failed");
                    findings.insert(question.clone(), format!("Research failed: {}", e));

                    if let Some(cooldown) = self.pacing.after_failure(&e) {
                        self.pacer.pause(cooldown, PauseReason::RateLimited).await;
                    }
                }
            }
        }

        findings
    }

    /// Ask the model for a structured report over `findings`.
    ///
    /// Makes exactly one model call and returns its text unchanged.
    pub async fn generate_report(&self, findings: &Findings, topic: &str) -> Result<String> {
        let findings_json = findings.to_pretty_json()?;
        let prompt = report_prompt(topic, &findings_json);

        tracing::info!(topic, questions = findings.len(), "Generating report");
        self.llm.generate(&prompt, &self.report_config).await
    }

    /// Research then report.
    pub async fn run(&self, topic: &str, questions: &[String]) -> Result<ResearchOutcome> {
        let findings = self.conduct_research(topic, questions).await;
        let report = self.generate_report(&findings, topic).await?;
        Ok(ResearchOutcome { findings, report })
    }
}

/// Builder for [`ResearchAgent`]
#[derive(Default)]
pub struct ResearchAgentBuilder {
    llm: Option<Arc<dyn LLMProvider>>,
    reasoner: Option<Arc<dyn Reasoner>>,
    search: Option<Arc<dyn SearchProvider>>,
    tools: Option<ToolRegistry>,
    pacing: Option<PacingPolicy>,
    pacer: Option<Arc<dyn Pacer>>,
    max_iterations: Option<usize>,
    time_limit: Option<Duration>,
}

impl ResearchAgentBuilder {
    /// Text-generation provider (required)
    pub fn llm(mut self, llm: Arc<dyn LLMProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Reasoning delegate; defaults to a [`ReActAgent`] over the provider
    pub fn reasoner(mut self, reasoner: Arc<dyn Reasoner>) -> Self {
        self.reasoner = Some(reasoner);
        self
    }

    /// Search backend for the default tools; defaults to [`MockSearch`]
    pub fn search(mut self, search: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(search);
        self
    }

    /// Replace the default tool set entirely
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Defaults to [`TokioPacer`]
    pub fn pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Iteration bound for the default reasoner
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Per-question time limit for the default reasoner
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Build the agent.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no provider was supplied.
    pub fn build(self) -> Result<ResearchAgent> {
        let llm = self.llm.ok_or_else(|| {
            ResearchError::Configuration("ResearchAgent requires an LLM provider".to_string())
        })?;

        let tools = match self.tools {
            Some(tools) => tools,
            None => {
                let search = self.search.unwrap_or_else(|| Arc::new(MockSearch::new()));
                research_tools(search, llm.clone())
            }
        };

        let reasoner = match self.reasoner {
            Some(reasoner) => reasoner,
            None => {
                let mut agent = ReActAgent::new(llm.clone());
                if let Some(max) = self.max_iterations {
                    agent = agent.with_max_iterations(max);
                }
                if let Some(limit) = self.time_limit {
                    agent = agent.with_time_limit(limit);
                }
                Arc::new(agent)
            }
        };

        Ok(ResearchAgent {
            llm,
            reasoner,
            tools,
            pacing: self.pacing.unwrap_or_default(),
            pacer: self.pacer.unwrap_or_else(|| Arc::new(TokioPacer)),
            history: Mutex::new(ConversationHistory::new()),
            report_config: LLMConfig::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ScriptedProvider, ScriptedReply};
    use crate::reasoning::ScriptedReasoner;
    use crate::research::RecordingPacer;
    use std::time::Duration;

    fn questions(qs: &[&str]) -> Vec<String> {
        qs.iter().map(|q| q.to_string()).collect()
    }

    fn agent_with(
        reasoner: ScriptedReasoner,
        provider: ScriptedProvider,
    ) -> (ResearchAgent, Arc<ScriptedReasoner>, Arc<ScriptedProvider>, Arc<RecordingPacer>) {
        let reasoner = Arc::new(reasoner);
        let provider = Arc::new(provider);
        let pacer = Arc::new(RecordingPacer::new());
        let agent = ResearchAgent::builder()
            .llm(provider.clone())
            .reasoner(reasoner.clone())
            .pacer(pacer.clone())
            .build()
            .unwrap();
        (agent, reasoner, provider, pacer)
    }

    #[test]
    fn test_builder_requires_llm() {
        let err = ResearchAgent::builder().build().unwrap_err();
        assert!(matches!(err, ResearchError::Configuration(_)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let err = ResearchAgent::from_config(&ResearchConfig::default()).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY not found"));

        let mut config = ResearchConfig::default();
        config.llm.api_key = Some("key".to_string());
        let agent = ResearchAgent::from_config(&config).unwrap();
        assert_eq!(agent.tools().len(), 3);
        assert_eq!(agent.pacing().inter_question_delay, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_answers_in_order_with_pacing() {
        let (agent, reasoner, _, pacer) = agent_with(
            ScriptedReasoner::new(["A1", "A2", "A3"]),
            ScriptedProvider::new(Vec::<&str>::new()),
        );

        let findings = agent
            .conduct_research("Solar", &questions(&["q1", "q2", "q3"]))
            .await;

        assert_eq!(
            findings.iter().collect::<Vec<_>>(),
            vec![("q1", "A1"), ("q2", "A2"), ("q3", "A3")]
        );
        assert_eq!(
            pacer.pauses(),
            vec![
                (PauseReason::BetweenQuestions, Duration::from_secs(5)),
                (PauseReason::BetweenQuestions, Duration::from_secs(5)),
            ]
        );

        let prompts = reasoner.prompts();
        assert!(prompts[0].0.contains("Current research topic: Solar"));
        assert!(prompts[0].0.contains("User query: q1"));
        // each question sees the answers before it
        assert_eq!(prompts.iter().map(|(_, h)| *h).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_failures_are_recorded_and_loop_continues() {
        let (agent, _, _, pacer) = agent_with(
            ScriptedReasoner::new([
                ScriptedReply::Error("Gemini API error (429 Too Many Requests): slow".to_string()),
                ScriptedReply::Error("connection reset".to_string()),
                ScriptedReply::from("fine"),
            ]),
            ScriptedProvider::new(Vec::<&str>::new()),
        );

        let findings = agent
            .conduct_research("T", &questions(&["a", "b", "c"]))
            .await;

        assert_eq!(
            findings.get("a"),
            Some("Research failed: LLM provider error: Gemini API error (429 Too Many Requests): slow")
        );
        assert_eq!(findings.get("b"), Some("Research failed: LLM provider error: connection reset"));
        assert_eq!(findings.get("c"), Some("fine"));
        assert_eq!(
            pacer.pauses(),
            vec![(PauseReason::RateLimited, Duration::from_secs(30))]
        );
        assert_eq!(agent.history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_questions_collapse() {
        let (agent, reasoner, _, _) = agent_with(
            ScriptedReasoner::new(["first", "second"]),
            ScriptedProvider::new(Vec::<&str>::new()),
        );

        let findings = agent.conduct_research("T", &questions(&["same", "same"])).await;
        assert_eq!(reasoner.call_count(), 2);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.get("same"), Some("second"));
    }

    #[tokio::test]
    async fn test_empty_question_list() {
        let (agent, reasoner, _, pacer) = agent_with(
            ScriptedReasoner::new(Vec::<&str>::new()),
            ScriptedProvider::new(Vec::<&str>::new()),
        );
        assert!(agent.conduct_research("T", &[]).await.is_empty());
        assert_eq!(reasoner.call_count(), 0);
        assert!(pacer.pauses().is_empty());
    }

    #[tokio::test]
    async fn test_report_is_one_verbatim_call() {
        let (agent, reasoner, provider, _) = agent_with(
            ScriptedReasoner::new(Vec::<&str>::new()),
            ScriptedProvider::new(["  # Report\nNo sections here  "]),
        );

        let findings: Findings = [("q1", "a1"), ("q2", "a2")].into_iter().collect();
        let report = agent.generate_report(&findings, "Solar").await.unwrap();

        assert_eq!(report, "  # Report\nNo sections here  ");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(reasoner.call_count(), 0);

        let prompt = provider.requests()[0].flattened();
        assert!(prompt.contains("Generate a comprehensive research report on the topic: Solar"));
        assert!(prompt.contains("{\n  \"q1\": \"a1\",\n  \"q2\": \"a2\"\n}"));
    }

    #[tokio::test]
    async fn test_report_failure_propagates() {
        let (agent, _, _, _) = agent_with(
            ScriptedReasoner::new(["a"]),
            ScriptedProvider::new([ScriptedReply::Error("quota exhausted".to_string())]),
        );

        let err = agent.run("T", &questions(&["q"])).await.unwrap_err();
        assert!(err.is_rate_limit());
    }

    #[tokio::test]
    async fn test_default_reasoner_uses_tools() {
        let provider = Arc::new(ScriptedProvider::new([
            "Action: AcademicSearch\nAction Input: environmental impact of solar energy",
            "Final Answer: LCA studies favour solar.",
            "REPORT",
        ]));
        let pacer = Arc::new(RecordingPacer::new());
        let agent = ResearchAgent::builder()
            .llm(provider.clone())
            .pacer(pacer)
            .max_iterations(4)
            .build()
            .unwrap();

        let outcome = agent.run("Solar", &questions(&["impact?"])).await.unwrap();
        assert_eq!(outcome.findings.get("impact?"), Some("LCA studies favour solar."));
        assert_eq!(outcome.report, "REPORT");
        assert_eq!(provider.call_count(), 3);
        assert!(provider.requests()[1].flattened().contains("Life Cycle Assessment of Solar PV Systems"));
    }

    #[tokio::test]
    async fn test_time_limit_reaches_default_reasoner() {
        let provider = Arc::new(ScriptedProvider::new(["REPORT"]));
        let agent = ResearchAgent::builder()
            .llm(provider.clone())
            .pacer(Arc::new(RecordingPacer::new()))
            .time_limit(Duration::ZERO)
            .build()
            .unwrap();

        let outcome = agent.run("T", &questions(&["q"])).await.unwrap();
        assert_eq!(
            outcome.findings.get("q"),
            Some(crate::reasoning::ITERATION_LIMIT_MESSAGE)
        );
        assert_eq!(outcome.report, "REPORT");
        assert_eq!(provider.call_count(), 1);
    }
}
