/// LLM Client — the single point of entry for all Gemini calls in the portfolio.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API directly.
/// The chat widget only ever sees a `FragmentStream` produced here.
///
/// Model: gemini-3-flash-preview (hardcoded, see `gemini::MODEL`)
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{stream, Stream};
use thiserror::Error;
use tracing::{info, warn};

use crate::content::ContentStore;
use crate::models::chat::ConversationTurn;

pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod prompts;
pub mod sse;

pub use gemini::GeminiModel;

/// Sampling parameters are held constant across every request.
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("No Gemini API key configured")]
    MissingApiKey,

    #[error("Prompt blocked by the model: {0}")]
    Blocked(String),

    #[error("Stream interrupted: {0}")]
    Stream(String),
}

/// Lazy, finite, non-restartable sequence of text fragments in arrival order.
/// Ends after the first `Err`.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

/// Everything a model needs for one streaming generation.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    pub turns: &'a [ConversationTurn],
    pub sampling: SamplingParams,
}

/// Transport seam. `GeminiModel` in production, a scripted double in tests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_name(&self) -> &str;

    /// Opens a streaming generation. Errors here mean nothing was streamed.
    async fn open_stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, LlmError>;
}

/// The single LLM client used by the chat front end.
/// Owns the system instruction (built once from the content store) and
/// hides transport faults behind a fallback stream.
#[derive(Clone)]
pub struct LlmClient {
    model: Arc<dyn ChatModel>,
    system_instruction: Arc<str>,
    offline_message: Arc<str>,
}

impl LlmClient {
    pub fn new(model: Arc<dyn ChatModel>, content: &ContentStore) -> Self {
        let system_instruction = prompts::build_system_instruction(content);
        info!(
            "LLM client initialized (model: {}, system instruction: {} chars)",
            model.model_name(),
            system_instruction.len()
        );
        Self {
            model,
            system_instruction: system_instruction.into(),
            offline_message: content.assistant.offline_message.as_str().into(),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Streams a reply to `turns`. Never fails: if the request cannot be
    /// opened the fault is logged and a single-fragment stream carrying the
    /// offline message is returned instead.
    pub async fn stream_chat(&self, turns: &[ConversationTurn]) -> FragmentStream {
        let request = ChatRequest {
            system_instruction: &self.system_instruction,
            turns,
            sampling: SamplingParams::default(),
        };

        match self.model.open_stream(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Gemini request failed, substituting fallback reply: {e}");
                fallback_stream(&self.offline_message)
            }
        }
    }
}

/// A stream that yields `message` once and ends.
pub fn fallback_stream(message: &str) -> FragmentStream {
    Box::pin(stream::iter(vec![Ok(message.to_string())]))
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::mock::ScriptedModel;
    use super::*;

    fn store() -> ContentStore {
        ContentStore::builtin().unwrap()
    }

    async fn collect(stream: FragmentStream) -> Vec<Result<String, LlmError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_stream_chat_passes_fragments_through() {
        let model = Arc::new(ScriptedModel::fragments(&["Hel", "lo"]));
        let client = LlmClient::new(model.clone(), &store());

        let items = collect(client.stream_chat(&[ConversationTurn::user("hi")]).await).await;
        let texts: Vec<String> = items.into_iter().map(|i| i.unwrap()).collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_open_failure_becomes_single_fallback_fragment() {
        let model = Arc::new(ScriptedModel::unreachable());
        let store = store();
        let client = LlmClient::new(model, &store);

        let items = collect(client.stream_chat(&[ConversationTurn::user("hi")]).await).await;
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].as_ref().unwrap(),
            &store.assistant.offline_message
        );
    }

    #[tokio::test]
    async fn test_request_carries_history_instruction_and_fixed_sampling() {
        let model = Arc::new(ScriptedModel::fragments(&["ok"]));
        let client = LlmClient::new(model.clone(), &store());
        let turns = vec![
            ConversationTurn::assistant("greeting"),
            ConversationTurn::user("question"),
        ];

        let _ = collect(client.stream_chat(&turns).await).await;
        let _ = collect(client.stream_chat(&turns).await).await;

        let seen = model.requests();
        assert_eq!(seen.len(), 2);
        for request in &seen {
            assert_eq!(request.turns, turns);
            assert_eq!(request.system_instruction, client.system_instruction());
            assert_eq!(request.sampling, SamplingParams::default());
        }
    }

    #[tokio::test]
    async fn test_fallback_stream_yields_once() {
        let items = collect(fallback_stream("offline")).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "offline");
    }

    #[test]
    fn test_sampling_defaults_are_constant() {
        let params = SamplingParams::default();
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_p, 0.9);
    }
}
