//! Error types for research operations

/// Result type for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;

/// Error types for the research agent
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    /// Configuration error (missing credentials, invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote model call failed
    #[error("LLM provider error: {0}")]
    Provider(String),

    /// Tool execution failed outside the reasoning loop
    #[error("Tool error: {0}")]
    Tool(String),

    /// Model output could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Caller supplied invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Requested job does not exist
    #[error("Research not found: {0}")]
    NotFound(String),

    /// Requested job exists but has not completed
    #[error("Research not completed yet: {0}")]
    NotReady(String),

    /// Background job failed
    #[error("Job error: {0}")]
    Job(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ResearchError {
    /// Whether the error text signals a rate limit or exhausted quota.
    ///
    /// Matches the literal `429` or a case-insensitive `quota` anywhere in the
    /// rendered message.
    pub fn is_rate_limit(&self) -> bool {
        is_rate_limit_message(&self.to_string())
    }
}

/// Substring test shared by [`ResearchError::is_rate_limit`] and callers that
/// only hold the rendered message.
pub fn is_rate_limit_message(message: &str) -> bool {
    message.contains("429") || message.to_lowercase().contains("quota")
}

impl From<String> for ResearchError {
    fn from(s: String) -> Self {
        ResearchError::Other(s)
    }
}

impl From<&str> for ResearchError {
    fn from(s: &str) -> Self {
        ResearchError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for ResearchError {
    fn from(err: anyhow::Error) -> Self {
        ResearchError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        let err = ResearchError::Provider(
            "Gemini API error (429 Too Many Requests): slow down".to_string(),
        );
        assert!(err.is_rate_limit());

        let err = ResearchError::Provider("Resource has been exhausted (check QUOTA)".to_string());
        assert!(err.is_rate_limit());

        let err = ResearchError::Provider("Gemini API error (500): boom".to_string());
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn test_display_prefixes() {
        let err = ResearchError::Configuration("missing key".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing key");

        let err: ResearchError = "plain".into();
        assert_eq!(err.to_string(), "plain");
    }
}
