//! Structured output parsing
//!
//! Parses the Thought / Action / Action Input / Observation / Final Answer
//! text format the reasoning loop asks the model to produce.
//!
//! # Example
//!
//! ```rust
//! use research_core::parsing::{ReActDecision, ReActParser};
//!
//! let parser = ReActParser::new();
//! let decision = parser
//!     .decide("Thought: I know this\nFinal Answer: 42")
//!     .unwrap();
//! assert_eq!(decision, ReActDecision::FinalAnswer("42".to_string()));
//! ```

mod parser;
mod react;

pub use parser::{OutputParser, ParseError, ParseResult};
pub(crate) use react::unquote;
pub use react::{ReActDecision, ReActParser, ReActStep, ReActStepType};
