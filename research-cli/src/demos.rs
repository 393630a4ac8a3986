//! Canned research runs
//!
//! Each demo has a fixed topic and question list and writes its report into
//! a target directory. `custom` researches one question at a time and saves
//! the answer to each before moving on.

use anyhow::Context;
use clap::ValueEnum;
use research_core::research::{Findings, ResearchAgent};
use std::path::{Path, PathBuf};

use crate::report::{preview, write_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Renewable energy trends, four questions
    Basic,
    /// LLMs in education, scholarly focus
    Academic,
    /// Quantum computing, saved question by question
    Custom,
    /// Solar energy, two questions to stay within free-tier quota
    Lightweight,
}

/// What a demo researches and where it writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    pub topic: &'static str,
    pub questions: &'static [&'static str],
    pub heading_prefix: &'static str,
    pub output_file: String,
    pub preview_chars: Option<usize>,
    pub stepwise: bool,
}

impl DemoPlan {
    pub fn heading(&self) -> String {
        format!("{}: {}", self.heading_prefix, self.topic)
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.iter().map(|q| q.to_string()).collect()
    }
}

const BASIC_QUESTIONS: &[&str] = &[
    "What are the latest developments in solar energy technology?",
    "How is wind energy adoption progressing globally?",
    "What are the economic impacts of renewable energy transition?",
    "What challenges remain in renewable energy storage?",
];

const ACADEMIC_QUESTIONS: &[&str] = &[
    "What are the most cited papers about LLMs in educational applications?",
    "How are transformer architectures being used in adaptive learning systems?",
    "What ethical concerns have been raised about AI in education?",
    "What empirical studies show the effectiveness of LLMs in improving learning outcomes?",
];

const CUSTOM_QUESTIONS: &[&str] = &[
    "What are the current practical applications of quantum computing?",
    "Which companies are leading in quantum computing development?",
    "What are the main technical challenges in quantum computing?",
    "How might quantum computing impact cryptography and cybersecurity?",
];

const LIGHTWEIGHT_QUESTIONS: &[&str] = &[
    "What are the main environmental benefits of solar energy?",
    "What are the economic advantages of solar power?",
];

impl Demo {
    pub fn plan(self) -> DemoPlan {
        match self {
            Demo::Basic => DemoPlan {
                topic: "Renewable Energy Trends 2024",
                questions: BASIC_QUESTIONS,
                heading_prefix: "Research Report",
                output_file: format!("renewable_energy_research_{}_questions.txt", BASIC_QUESTIONS.len()),
                preview_chars: Some(300),
                stepwise: false,
            },
            Demo::Academic => DemoPlan {
                topic: "Large Language Models in Education",
                questions: ACADEMIC_QUESTIONS,
                heading_prefix: "Academic Research Report",
                output_file: "academic_llm_education_research.txt".to_string(),
                preview_chars: None,
                stepwise: false,
            },
            Demo::Custom => DemoPlan {
                topic: "Quantum Computing Applications",
                questions: CUSTOM_QUESTIONS,
                heading_prefix: "Comprehensive Research Report",
                output_file: "quantum_computing_comprehensive_report.txt".to_string(),
                preview_chars: None,
                stepwise: true,
            },
            Demo::Lightweight => DemoPlan {
                topic: "Solar Energy Benefits",
                questions: LIGHTWEIGHT_QUESTIONS,
                heading_prefix: "Lightweight Research Report",
                output_file: "lightweight_solar_research.txt".to_string(),
                preview_chars: Some(200),
                stepwise: false,
            },
        }
    }
}

/// Files produced by a demo run
#[derive(Debug)]
pub struct DemoRun {
    pub report_path: PathBuf,
    pub intermediate: Vec<PathBuf>,
    pub report: String,
}

pub async fn run_demo(agent: &ResearchAgent, demo: Demo, dir: &Path) -> anyhow::Result<DemoRun> {
    let plan = demo.plan();
    println!("Research Topic: {}", plan.topic);
    println!("Research Questions:");
    for (i, q) in plan.questions.iter().enumerate() {
        println!("   {}. {}", i + 1, q);
    }
    println!("{}", "-".repeat(60));

    let mut intermediate = Vec::new();
    let findings = if plan.stepwise {
        let mut all = Findings::new();
        let total = plan.questions.len();
        for (i, question) in plan.questions().into_iter().enumerate() {
            println!("\nResearching question {}/{}: {}", i + 1, total, question);
            let answered = agent
                .conduct_research(plan.topic, std::slice::from_ref(&question))
                .await;

            let path = dir.join(format!("intermediate_results_q{}.json", i + 1));
            std::fs::write(&path, answered.to_pretty_json()?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("   Question {} completed and saved", i + 1);

            intermediate.push(path);
            all.extend(answered);
        }
        all
    } else {
        agent.conduct_research(plan.topic, &plan.questions()).await
    };

    let report = agent.generate_report(&findings, plan.topic).await?;
    let report_path = dir.join(&plan.output_file);
    write_report(&report_path, &plan.heading(), None, &report)?;

    println!("Research completed!");
    println!("Report saved to: {}", report_path.display());
    if let Some(limit) = plan.preview_chars {
        println!("Report length: {} characters", report.chars().count());
        println!("\nReport Preview:");
        println!("{}", "-".repeat(40));
        println!("{}", preview(&report, limit));
    }

    Ok(DemoRun {
        report_path,
        intermediate,
        report,
    })
}
