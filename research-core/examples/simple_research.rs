//! Simple research example
//!
//! Runs a two-question research pass against a scripted model so it works
//! without an API key. Use `ResearchAgent::from_config` instead to talk to
//! the hosted model.

use research_core::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Simple Research Example");
    println!("=======================\n");

    let llm = Arc::new(ScriptedProvider::new([
        "Thought: check the web\nAction: WebSearch\nAction Input: environmental benefits of solar energy",
        "Thought: I now know the final answer\nFinal Answer: Solar cuts emissions and uses little water.",
        "Final Answer: Panels pay back in 6 to 10 years in most markets.",
        "1. Executive Summary\nSolar is clean and increasingly cheap.",
    ]));

    let agent = ResearchAgent::builder()
        .llm(llm.clone())
        .pacing(PacingPolicy::none())
        .build()?;

    println!("Tools: {}\n", agent.tools().names().join(", "));

    let questions = vec![
        "What are the environmental benefits?".to_string(),
        "What is the payback period?".to_string(),
    ];
    let outcome = agent.run("Solar Energy", &questions).await?;

    for (question, answer) in outcome.findings.iter() {
        println!("Q: {}\nA: {}\n", question, answer);
    }
    println!("Report:\n{}\n", outcome.report);
    println!("Model calls: {}", llm.call_count());

    Ok(())
}
