//! Chat completion client for OpenAI-compatible serving endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_status, ProviderError, Result};
use crate::LanguageModel;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Connection and generation options for `ChatModelClient`.
#[derive(Debug, Clone)]
pub struct ChatModelSettings {
    /// Full URL of the completion endpoint.
    pub api_url: String,
    /// Model or serving endpoint name, sent as `model`.
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

/// Client for a hosted chat model.
#[derive(Debug, Clone)]
pub struct ChatModelClient {
    client: ReqwestClient,
    settings: ChatModelSettings,
}

impl ChatModelClient {
    pub fn new(settings: ChatModelSettings) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self { client, settings })
    }

    /// The endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.settings.api_url
    }
}

#[async_trait]
impl LanguageModel for ChatModelClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        debug!(
            model = %self.settings.model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        let mut request = self.client.post(&self.settings.api_url).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key);
        }
        let response = check_status(request.send().await?).await?;
        let parsed: ChatResponse = response.json().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::InvalidResponse("completion has no choices".into()))
    }
}
