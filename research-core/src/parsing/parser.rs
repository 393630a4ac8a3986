//! Core parser trait and error types

use thiserror::Error;

/// Error type for parsing operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Empty input
    #[error("Empty input")]
    EmptyInput,
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

impl From<ParseError> for crate::error::ResearchError {
    fn from(err: ParseError) -> Self {
        crate::error::ResearchError::Parse(err.to_string())
    }
}

/// Trait for output parsers
pub trait OutputParser: Send + Sync {
    /// The output type produced by this parser
    type Output;

    /// Parse the raw output string
    fn parse(&self, raw: &str) -> ParseResult<Self::Output>;

    /// Check if this parser can handle the input
    fn can_parse(&self, raw: &str) -> bool;

    /// Get the parser name for debugging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResearchError;

    #[test]
    fn test_parse_error_converts() {
        let err: ResearchError = ParseError::MissingField("Action Input".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Parse error: Missing required field: Action Input"
        );
    }
}
