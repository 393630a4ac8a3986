//! Research orchestration
//!
//! [`ResearchAgent::conduct_research`] walks a list of questions through the
//! reasoning delegate with fixed pacing; [`ResearchAgent::generate_report`]
//! turns the collected [`Findings`] into one structured report.

mod findings;
mod orchestrator;
mod pacing;

pub use findings::Findings;
pub use orchestrator::{ResearchAgent, ResearchAgentBuilder, ResearchOutcome};
pub use pacing::{Pacer, PacingPolicy, PauseReason, RecordingPacer, TokioPacer};
