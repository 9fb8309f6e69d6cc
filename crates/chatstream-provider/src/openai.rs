//! OpenAI-compatible streaming completion client.
//!
//! Speaks the chat-completions wire format with `stream: true` and decodes
//! the SSE response into [`StreamEvent`]s.

use crate::{
    CompletionProvider, CompletionRequest, CompletionStream, ProviderError, Result, StopReason,
    StreamEvent,
};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// OpenAI-compatible completion provider.
pub struct OpenAiProvider {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: SecretString,

    /// API base URL.
    api_base: String,
}

impl OpenAiProvider {
    /// Create a new provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::config("API key is required"));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            api_key: SecretString::new(api_key),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    /// Create a new provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ProviderError::config("OPENAI_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    /// Set the API base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Set the request timeout, rebuilding the HTTP client.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn build_request(request: &CompletionRequest) -> WireRequest {
        WireRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            n: request.params.n,
            stop: request.params.stop.clone(),
            presence_penalty: request.params.presence_penalty,
            frequency_penalty: request.params.frequency_penalty,
            stream: true,
        }
    }

    async fn map_error_response(response: reqwest::Response) -> ProviderError {
        let status = response.status().as_u16();
        let retry_after = parse_retry_after(response.headers());
        let body: WireError = response.json().await.unwrap_or_else(|_| WireError {
            error: WireErrorDetail {
                message: "unknown error".to_string(),
            },
        });

        match status {
            401 => ProviderError::auth(body.error.message),
            429 => ProviderError::rate_limit(body.error.message, retry_after),
            400 => ProviderError::invalid_request(body.error.message),
            _ => ProviderError::server_error(status, body.error.message),
        }
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::config(format!("failed to create HTTP client: {e}")))
}

/// Retry-After header in whole seconds; HTTP-date values are ignored.
fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn stream_completion(&self, request: CompletionRequest) -> Result<CompletionStream> {
        let wire_request = Self::build_request(&request);

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "starting streaming completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::map_error_response(response).await);
        }

        let event_stream = response.bytes_stream().eventsource();

        let stream = event_stream.filter_map(|result| async move {
            match result {
                Ok(event) => {
                    if event.data.is_empty() || event.data == "[DONE]" {
                        return None;
                    }

                    match serde_json::from_str::<WireChunk>(&event.data) {
                        Ok(chunk) => {
                            let choice = chunk.choices.into_iter().next()?;

                            if let Some(content) = choice.delta.content {
                                return Some(Ok(StreamEvent::ContentDelta { delta: content }));
                            }

                            choice.finish_reason.map(|reason| {
                                Ok(StreamEvent::End {
                                    stop_reason: parse_stop_reason(&reason),
                                })
                            })
                        }
                        Err(e) => {
                            warn!("failed to parse SSE event: {e}");
                            None
                        }
                    }
                }
                Err(e) => Some(Err(ProviderError::stream(e.to_string()))),
            }
        });

        Ok(Box::pin(stream))
    }
}

fn parse_stop_reason(finish_reason: &str) -> StopReason {
    match finish_reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        "content_filter" => StopReason::ContentFilter,
        _ => StopReason::Unknown,
    }
}

// Internal wire types

#[derive(Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: usize,
    temperature: f32,
    top_p: f32,
    n: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
    presence_penalty: f32,
    frequency_penalty: f32,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct WireChunk {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    delta: WireDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireError {
    error: WireErrorDetail,
}

#[derive(Deserialize)]
struct WireErrorDetail {
    message: String,
}
