//! Configuration types for the research agent

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, ResearchError};

/// Placeholder value shipped in sample `.env` files; treated as unset.
pub const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ResearchConfig {
    /// Hosted model settings
    pub llm: LlmSettings,

    /// Throttling between model calls
    pub pacing: PacingConfig,

    /// Reasoning loop settings
    pub agent: AgentSettings,

    /// HTTP service settings
    pub server: ServerConfig,
}

/// Hosted model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key (prefer the `GEMINI_API_KEY` env var)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model resource name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Base URL of the generative language API
    pub base_url: String,

    /// Optional cap on generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<usize>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "models/gemini-1.5-flash".to_string(),
            temperature: 0.3,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_output_tokens: None,
        }
    }
}

impl LlmSettings {
    /// The API key, if one is set and is not the sample placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != API_KEY_PLACEHOLDER)
    }
}

/// Pacing between sequential model calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each successful question except the last
    #[serde(with = "humantime_serde")]
    pub inter_question_delay: Duration,

    /// Pause after a failure that looks like a rate limit
    #[serde(with = "humantime_serde")]
    pub rate_limit_cooldown: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            inter_question_delay: Duration::from_secs(5),
            rate_limit_cooldown: Duration::from_secs(30),
        }
    }
}

/// Reasoning loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Maximum model round-trips per question
    pub max_iterations: usize,

    /// Wall-clock bound per question; unbounded when unset
    #[serde(default, with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<Duration>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            time_limit: None,
        }
    }
}

/// How job identifiers are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobIdStrategy {
    /// `research_YYYYmmdd_HHMMSS`; submissions in the same second collide
    #[default]
    Timestamp,

    /// Timestamp prefix plus a random suffix
    Unique,
}

/// HTTP service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Jobs allowed to run at once; further jobs wait for a slot
    pub max_concurrent_jobs: usize,

    /// Entries returned by the history endpoint
    pub history_limit: usize,

    /// Identifier scheme for new jobs
    pub job_ids: JobIdStrategy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_concurrent_jobs: 4,
            history_limit: 10,
            job_ids: JobIdStrategy::Timestamp,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ResearchConfig {
    /// Build the layered figment used by [`ResearchConfig::load`].
    ///
    /// Layers, later wins:
    /// 1. Defaults
    /// 2. `research.toml`
    /// 3. File named by `RESEARCH_CONFIG_PATH`
    /// 4. `RESEARCH_`-prefixed env vars, nested with `__`
    /// 5. `GEMINI_API_KEY` as `llm.api_key`
    pub fn figment() -> figment::Figment {
        use figment::{
            Figment,
            providers::{Env, Format, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(ResearchConfig::default()))
            .merge(Toml::file("research.toml"));

        if let Ok(path) = std::env::var("RESEARCH_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed("RESEARCH_").split("__"))
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "llm.api_key".into()))
    }

    /// Load configuration from files and environment, then validate.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source is malformed or the API key
    /// is missing.
    pub fn load() -> Result<Self> {
        let config = Self::load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Load without validation, for diagnostics that report problems
    /// themselves.
    pub fn load_unvalidated() -> Result<Self> {
        Self::figment().extract().map_err(|e| {
            ResearchError::Configuration(format!("Failed to load configuration: {}", e))
        })
    }

    /// Load configuration from a specific file path.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        use figment::{
            Figment,
            providers::{Format, Serialized, Toml},
        };

        let config: ResearchConfig = Figment::from(Serialized::defaults(ResearchConfig::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| {
                ResearchError::Configuration(format!("Failed to load configuration file: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.llm.usable_api_key().is_none() {
            return Err(ResearchError::Configuration(format!(
                "{} not found in environment variables",
                API_KEY_ENV
            )));
        }
        if self.server.max_concurrent_jobs == 0 {
            return Err(ResearchError::Configuration(
                "server.max_concurrent_jobs must be at least 1".to_string(),
            ));
        }
        if self.server.history_limit == 0 {
            return Err(ResearchError::Configuration(
                "server.history_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.llm.model, "models/gemini-1.5-flash");
        assert_eq!(config.llm.temperature, 0.3);
        assert_eq!(config.pacing.inter_question_delay, Duration::from_secs(5));
        assert_eq!(config.pacing.rate_limit_cooldown, Duration::from_secs(30));
        assert_eq!(config.server.history_limit, 10);
        assert_eq!(config.server.job_ids, JobIdStrategy::Timestamp);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.agent.max_iterations, 15);
        assert_eq!(config.agent.time_limit, None);
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let config = ResearchConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY not found"));
    }

    #[test]
    fn test_placeholder_api_key_is_rejected() {
        let mut config = ResearchConfig::default();
        config.llm.api_key = Some(API_KEY_PLACEHOLDER.to_string());
        assert!(config.validate().is_err());

        config.llm.api_key = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.llm.api_key = Some("real-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_rejected() {
        let mut config = ResearchConfig::default();
        config.llm.api_key = Some("k".to_string());
        config.server.max_concurrent_jobs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layered_loading() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "research.toml",
                r#"
                [pacing]
                inter_question_delay = "2s"

                [server]
                port = 8080
                job_ids = "unique"
                "#,
            )?;
            jail.set_env("GEMINI_API_KEY", "from-env");
            jail.set_env("RESEARCH_SERVER__HISTORY_LIMIT", "3");
            jail.set_env("RESEARCH_AGENT__TIME_LIMIT", "90s");

            let config = ResearchConfig::load().expect("config should load");
            assert_eq!(config.llm.api_key.as_deref(), Some("from-env"));
            assert_eq!(config.pacing.inter_question_delay, Duration::from_secs(2));
            assert_eq!(config.pacing.rate_limit_cooldown, Duration::from_secs(30));
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.history_limit, 3);
            assert_eq!(config.server.job_ids, JobIdStrategy::Unique);
            assert_eq!(config.agent.time_limit, Some(Duration::from_secs(90)));
            Ok(())
        });
    }

    #[test]
    fn test_from_file_validates() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[llm]\nmodel = \"models/gemini-2.0-flash\"\n")?;
            assert!(ResearchConfig::from_file("custom.toml").is_err());

            jail.create_file(
                "keyed.toml",
                "[llm]\napi_key = \"abc\"\nmodel = \"models/gemini-2.0-flash\"\n",
            )?;
            let config = ResearchConfig::from_file("keyed.toml").expect("valid file");
            assert_eq!(config.llm.model, "models/gemini-2.0-flash");
            Ok(())
        });
    }
}
