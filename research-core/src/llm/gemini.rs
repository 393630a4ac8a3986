//! Gemini (Google generative language API) provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::error::{Result, ResearchError};
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, ModelInfo, TokenUsage};

/// Gemini provider over the REST `generateContent` endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: Option<usize>,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key
    /// * `model` - Model name, with or without the `models/` prefix
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let defaults = LlmSettings::default();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: normalize_model(&model.into()),
            base_url: defaults.base_url,
            temperature: defaults.temperature,
            max_output_tokens: None,
        }
    }

    /// Create from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no usable API key is present.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = settings.usable_api_key().ok_or_else(|| {
            ResearchError::Configuration(
                "GEMINI_API_KEY not found in environment variables".to_string(),
            )
        })?;

        Ok(Self::new(api_key, &settings.model)
            .with_base_url(&settings.base_url)
            .with_temperature(settings.temperature)
            .with_max_output_tokens(settings.max_output_tokens))
    }

    /// Override the API base URL (useful for proxies and local fakes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Default temperature when a request does not set one.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Default token cap when a request does not set one.
    pub fn with_max_output_tokens(mut self, tokens: Option<usize>) -> Self {
        self.max_output_tokens = tokens;
        self
    }

    /// Get the model resource name (always `models/...`).
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Same provider pointed at a different model.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            model: normalize_model(&model.into()),
            base_url: self.base_url.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// List the models visible to this API key, following pagination.
    pub async fn list_models(&self) -> Result<Vec<GeminiModel>> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("key", self.api_key.clone())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| {
                    ResearchError::Provider(format!("Failed to send request to Gemini: {}", e))
                })?;

            let response = check_status(response).await?;
            let page: ListModelsResponse = response.json().await.map_err(|e| {
                ResearchError::Provider(format!("Failed to parse Gemini model list: {}", e))
            })?;

            models.extend(page.models);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(models)
    }

    fn build_body(&self, request: &LLMRequest) -> GeminiRequest {
        let system_text = request
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(to_content)
            .collect();

        GeminiRequest {
            contents,
            system_instruction: if system_text.is_empty() {
                None
            } else {
                Some(GeminiContent {
                    role: None,
                    parts: vec![GeminiPart { text: system_text }],
                })
            },
            generation_config: GenerationConfig {
                temperature: Some(request.temperature.unwrap_or(self.temperature)),
                max_output_tokens: request.max_tokens.or(self.max_output_tokens),
                stop_sequences: if request.stop_sequences.is_empty() {
                    None
                } else {
                    Some(request.stop_sequences.clone())
                },
            },
        }
    }
}

fn normalize_model(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

fn to_content(message: &Message) -> GeminiContent {
    let role = match message.role {
        MessageRole::Assistant => "model",
        _ => "user",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![GeminiPart {
            text: message.content.clone(),
        }],
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    let detail = serde_json::from_str::<GeminiErrorEnvelope>(&text)
        .map(|e| match e.error.status {
            Some(s) => format!("{}: {}", s, e.error.message),
            None => e.error.message,
        })
        .unwrap_or(text);

    Err(ResearchError::Provider(format!(
        "Gemini API error ({}): {}",
        status, detail
    )))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
    status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

/// A model entry from the `models` listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiModel {
    /// Resource name, e.g. `models/gemini-1.5-flash`
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl GeminiModel {
    /// Whether the model can serve `generateContent`
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

fn extract_response(parsed: GeminiResponse) -> Result<LLMResponse> {
    if parsed.candidates.is_empty() {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(ResearchError::Provider(format!(
            "Gemini API returned no candidates ({})",
            reason
        )));
    }

    let content = parsed.candidates[0]
        .content
        .as_ref()
        .map(|c| {
            c.parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default();

    let usage = parsed.usage_metadata.map(|u| TokenUsage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let body = self.build_body(request);
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        tracing::debug!(model = %self.model, messages = request.messages.len(), "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ResearchError::Provider(format!("Failed to send request to Gemini: {}", e))
            })?;

        let response = check_status(response).await?;

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            ResearchError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        extract_response(parsed)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "gemini".to_string(),
            model_name: self.model.clone(),
        }
    }
}
