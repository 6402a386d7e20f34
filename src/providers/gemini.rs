//! Google Gemini provider implementation for OKU
//!
//! Talks to the `generateContent` REST endpoint. The endpoint is stateless,
//! so each session keeps the curated conversation history and replays it,
//! together with the system instruction and generation config, on every
//! request.

use crate::config::GeminiConfig;
use crate::error::{OkuError, Result};
use crate::providers::{ChatSession, Provider, SamplingConfig, SessionRequest};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use oku::config::GeminiConfig;
/// use oku::providers::{GeminiProvider, Provider, SessionRequest};
///
/// # async fn example() -> oku::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default())?;
/// let mut session = provider
///     .create_session(SessionRequest::new("You are calm.", "gemini-2.5-flash"))
///     .await?;
/// let reply = session.send_message("Bonjour").await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiSystemInstruction,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiTextPart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
}

impl From<SamplingConfig> for GeminiGenerationConfig {
    fn from(sampling: SamplingConfig) -> Self {
        Self {
            temperature: sampling.temperature,
            top_k: sampling.top_k,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiTextPart>,
}

impl GeminiContent {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![GeminiTextPart { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, empty if none
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// A missing API key is logged but not fatal: requests are still
    /// attempted and the endpoint rejects them.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use oku::config::GeminiConfig;
    /// use oku::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("oku/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OkuError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            tracing::error!("Gemini API key is missing; requests will be rejected");
        }

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    pub fn api_base(&self) -> &str {
        &self.config.api_base
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn create_session(&self, request: SessionRequest) -> Result<Box<dyn ChatSession>> {
        if request.model.trim().is_empty() {
            return Err(OkuError::Provider("Model name cannot be empty".to_string()).into());
        }

        let id = uuid::Uuid::new_v4().to_string();
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            request.model
        );

        tracing::debug!(
            "Created Gemini session {}: model={}, temperature={}, top_k={}",
            id,
            request.model,
            request.sampling.temperature,
            request.sampling.top_k
        );

        Ok(Box::new(GeminiSession {
            id,
            client: self.client.clone(),
            url,
            api_key: self.config.api_key.clone().unwrap_or_default(),
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiTextPart {
                    text: request.system_instruction,
                }],
            },
            generation_config: request.sampling.into(),
            history: Vec::new(),
        }))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// One Gemini conversation
struct GeminiSession {
    id: String,
    client: Client,
    url: String,
    api_key: String,
    system_instruction: GeminiSystemInstruction,
    generation_config: GeminiGenerationConfig,
    history: Vec<GeminiContent>,
}

impl GeminiSession {
    fn build_request(&self, text: &str) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(GeminiContent::text("user", text));
        GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.clone(),
            generation_config: self.generation_config.clone(),
        }
    }
}

#[async_trait]
impl ChatSession for GeminiSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        let request = self.build_request(text);

        tracing::debug!(
            "Sending Gemini request: session={}, {} contents",
            self.id,
            request.contents.len()
        );

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                OkuError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(OkuError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let raw = response.text().await.map_err(OkuError::Http)?;
        let body: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            OkuError::Serialization(e)
        })?;

        if let Some(usage) = &body.usage_metadata {
            tracing::debug!(
                "Gemini usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }

        let reply = body.text();
        if reply.is_empty() {
            let finish_reason = body
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref())
                .unwrap_or("none");
            tracing::warn!(
                "Gemini returned no text (finish_reason={}); exchange not recorded",
                finish_reason
            );
        } else {
            self.history.push(GeminiContent::text("user", text));
            self.history.push(GeminiContent::text("model", reply.clone()));
        }

        Ok(reply)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GeminiSession {
        GeminiSession {
            id: "s1".to_string(),
            client: Client::new(),
            url: "http://localhost/models/m:generateContent".to_string(),
            api_key: "k".to_string(),
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiTextPart {
                    text: "be calm".to_string(),
                }],
            },
            generation_config: SamplingConfig::default().into(),
            history: vec![
                GeminiContent::text("user", "hi"),
                GeminiContent::text("model", "hello"),
            ],
        }
    }

    #[test]
    fn test_provider_creation_without_key() {
        let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
        assert_eq!(provider.model(), "gemini-2.5-flash");
        assert_eq!(
            provider.api_base(),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_request_serialization_shape() {
        let request = session().build_request("ça va?");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be calm");
        assert_eq!(json["generationConfig"]["topK"], 40);
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);

        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "ça va?");
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Allo "},{"text":"toi"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(body.text(), "Allo toi");
    }

    #[test]
    fn test_response_text_empty_when_no_candidates() {
        let body: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.text(), "");

        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(body.text(), "");
    }

    #[tokio::test]
    async fn test_create_session_rejects_empty_model() {
        let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
        let result = provider
            .create_session(SessionRequest::new("sys", "  "))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_session_starts_with_empty_history() {
        let provider = GeminiProvider::new(GeminiConfig::default()).unwrap();
        let session = provider
            .create_session(SessionRequest::new("sys", "gemini-2.5-flash"))
            .await
            .unwrap();
        assert_eq!(session.history_len(), 0);
        assert!(!session.id().is_empty());
    }
}
