//! Google Gemini transport — native Generative Language API.
//!
//! `POST {base}/v1beta/models/{MODEL}:streamGenerateContent?alt=sse`
//! with the API key in the `x-goog-api-key` header.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::sse::fragment_stream;
use super::{ChatModel, ChatRequest, FragmentStream, LlmError};
use crate::config::Config;
use crate::models::chat::{ConversationTurn, Role};

/// The model used for every chat request.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "gemini-3-flash-preview";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini names the assistant side `model`.
fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

fn build_request_body<'a>(request: &ChatRequest<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: request
            .turns
            .iter()
            .map(|turn: &'a ConversationTurn| Content {
                role: Some(wire_role(turn.role)),
                parts: vec![Part {
                    text: &turn.content,
                }],
            })
            .collect(),
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
        },
    }
}

/// Streaming Gemini client.
/// Retries 429 and 5xx responses with exponential backoff before the stream opens;
/// once bytes are flowing, faults are reported through the fragment stream.
///
/// The configured timeout bounds connecting and each silence between chunks,
/// never the reply as a whole.
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    idle_timeout: Duration,
}

impl GeminiModel {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(config.llm_timeout_secs);
        Ok(Self {
            client: Client::builder().connect_timeout(timeout).build()?,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            idle_timeout: timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, MODEL
        )
    }
}

#[async_trait]
impl ChatModel for GeminiModel {
    fn model_name(&self) -> &str {
        MODEL
    }

    async fn open_stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let body = build_request_body(request);
        let url = self.endpoint();

        debug!(
            "Opening Gemini stream: model={}, turns={}",
            MODEL,
            request.turns.len()
        );

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini request attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let send = self
                .client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send();

            let response = match tokio::time::timeout(self.idle_timeout, send).await {
                Ok(Ok(r)) => r,
                Ok(Err(e)) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
                Err(_) => {
                    warn!(
                        "Gemini sent no response headers within {}s",
                        self.idle_timeout.as_secs()
                    );
                    last_error = Some(LlmError::Stream(format!(
                        "no response within {}s",
                        self.idle_timeout.as_secs()
                    )));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            debug!("Gemini stream opened (status {})", status);
            return Ok(fragment_stream(
                Box::pin(response.bytes_stream()),
                self.idle_timeout,
            ));
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::SamplingParams;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            gemini_api_key: api_key.map(str::to_string),
            gemini_base_url: "http://127.0.0.1:9/".to_string(),
            llm_timeout_secs: 5,
            content_path: None,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_request_body_wire_format() {
        let turns = vec![
            ConversationTurn::assistant("Hello!"),
            ConversationTurn::user("What is MPAY?"),
        ];
        let request = ChatRequest {
            system_instruction: "be brief",
            turns: &turns,
            sampling: SamplingParams::default(),
        };

        let json = serde_json::to_value(build_request_body(&request)).unwrap();
        assert_eq!(json["contents"][0]["role"], "model");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hello!");
        assert_eq!(json["contents"][1]["role"], "user");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());

        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        let top_p = json["generationConfig"]["topP"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert!((top_p - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let model = GeminiModel::new(&config(Some("k"))).unwrap();
        assert_eq!(
            model.endpoint(),
            "http://127.0.0.1:9/v1beta/models/gemini-3-flash-preview:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn test_timeout_applies_between_chunks_not_to_whole_reply() {
        let model = GeminiModel::new(&config(Some("k"))).unwrap();
        assert_eq!(model.idle_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let model = GeminiModel::new(&config(None)).unwrap();
        let turns = vec![ConversationTurn::user("hi")];
        let request = ChatRequest {
            system_instruction: "sys",
            turns: &turns,
            sampling: SamplingParams::default(),
        };

        let result = model.open_stream(&request).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }
}
