//! Research Agent CLI - run research from the command line

mod demos;
mod offline;
mod report;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use research_core::config::{API_KEY_ENV, ResearchConfig};
use research_core::llm::{GeminiProvider, LLMConfig, LLMProvider};
use research_core::research::{PacingPolicy, ResearchAgent};
use std::path::PathBuf;
use std::sync::Arc;

use demos::Demo;
use offline::OfflineProvider;

#[derive(Parser)]
#[command(name = "research-agent")]
#[command(about = "Research a topic with a Gemini-backed agent and write a report", long_about = None)]
#[command(version)]
struct Cli {
    /// Use the built-in offline model instead of Gemini
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a topic and save the report
    Research {
        /// Research topic
        #[arg(short, long)]
        topic: String,
        /// Research questions
        #[arg(short, long, num_args = 1.., required = true)]
        questions: Vec<String>,
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run one of the canned research examples
    Demo {
        #[arg(value_enum)]
        demo: Demo,
        /// Directory the report files are written to
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// List Gemini models that support text generation
    Models,
    /// Check configuration and probe the configured model
    Verify,
    /// Version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Research {
            topic,
            questions,
            output,
        } => {
            let agent = build_agent(cli.offline)?;
            research(&agent, &topic, &questions, output).await?;
        }
        Commands::Demo { demo, dir } => {
            let agent = build_agent(cli.offline)?;
            demos::run_demo(&agent, demo, &dir).await?;
        }
        Commands::Models => list_models().await?,
        Commands::Verify => verify().await?,
        Commands::Version => {
            println!("research-agent {}", env!("CARGO_PKG_VERSION"));
            println!("research-core {}", research_core::VERSION);
        }
    }

    Ok(())
}

fn build_agent(offline: bool) -> Result<ResearchAgent> {
    if offline {
        tracing::info!("Using the offline model");
        return Ok(ResearchAgent::builder()
            .llm(Arc::new(OfflineProvider::new()))
            .pacing(PacingPolicy::none())
            .build()?);
    }

    let config = ResearchConfig::load().context("failed to load configuration")?;
    Ok(ResearchAgent::from_config(&config)?)
}

async fn research(
    agent: &ResearchAgent,
    topic: &str,
    questions: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    println!("Starting research on: {}", topic);
    println!("Research questions: {:?}", questions);
    println!("{}", "-".repeat(50));

    let findings = agent.conduct_research(topic, questions).await;
    let text = agent.generate_report(&findings, topic).await?;

    let now = Local::now();
    let path = output.unwrap_or_else(|| report::default_report_path(now));
    report::write_report(
        &path,
        &format!("Research Report: {}", topic),
        Some(report::generated_on(now).as_str()),
        &text,
    )?;

    println!("\nResearch completed! Report saved to: {}", path.display());
    println!("\nSummary:");
    println!("{}", "-".repeat(50));
    println!("{}", report::preview(&text, report::PREVIEW_CHARS));
    Ok(())
}

fn gemini() -> Result<GeminiProvider> {
    let config = ResearchConfig::load_unvalidated().context("failed to load configuration")?;
    GeminiProvider::from_settings(&config.llm)
        .with_context(|| format!("set {} in the environment or a .env file", API_KEY_ENV))
}

async fn list_models() -> Result<()> {
    let provider = gemini()?;
    let models = provider.list_models().await.context("failed to list models")?;

    println!("Available models:");
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        println!("{} - {}", model.name, model.description);
    }
    Ok(())
}

async fn verify() -> Result<()> {
    println!("Research Agent Setup Verification");
    println!("{}", "=".repeat(50));

    let config = ResearchConfig::load_unvalidated().context("failed to load configuration")?;
    println!("Configuration loaded (model {})", config.llm.model);

    if config.llm.usable_api_key().is_none() {
        anyhow::bail!("{} not set or still using the placeholder", API_KEY_ENV);
    }
    println!("{} is set", API_KEY_ENV);
    config.validate()?;

    let provider = GeminiProvider::from_settings(&config.llm)?;
    match provider
        .generate("Reply with one short sentence confirming you are working.", &LLMConfig::default())
        .await
    {
        Ok(reply) => {
            println!("Model replied: {}", reply.trim());
            println!("Setup is complete and ready to use!");
            Ok(())
        }
        Err(e) if e.is_rate_limit() => {
            Err(e).context("the API key works but the quota is exhausted; try again later or enable billing")
        }
        Err(e) => Err(e).context("model probe failed"),
    }
}
