use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;

use super::{ChatModel, ChatRequest, FragmentStream, LlmError, SamplingParams};
use crate::models::chat::ConversationTurn;

/// Owned copy of a `ChatRequest`, kept so tests can inspect what was sent.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system_instruction: String,
    pub turns: Vec<ConversationTurn>,
    pub sampling: SamplingParams,
}

enum Script {
    Fragments(Vec<String>),
    FailAfter(Vec<String>),
    Unreachable,
}

/// Deterministic model for tests. Replays the same script on every call.
pub struct ScriptedModel {
    script: Script,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedModel {
    fn new(script: Script) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Streams `fragments` and ends cleanly.
    pub fn fragments(fragments: &[&str]) -> Self {
        Self::new(Script::Fragments(owned(fragments)))
    }

    /// Streams `fragments`, then a transport error.
    pub fn fail_after(fragments: &[&str]) -> Self {
        Self::new(Script::FailAfter(owned(fragments)))
    }

    /// Refuses to open a stream at all.
    pub fn unreachable() -> Self {
        Self::new(Script::Unreachable)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn owned(fragments: &[&str]) -> Vec<String> {
    fragments.iter().map(|f| f.to_string()).collect()
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted-mock"
    }

    async fn open_stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, LlmError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system_instruction: request.system_instruction.to_string(),
            turns: request.turns.to_vec(),
            sampling: request.sampling,
        });

        match &self.script {
            Script::Fragments(fragments) => Ok(Box::pin(stream::iter(
                fragments.clone().into_iter().map(Ok).collect::<Vec<_>>(),
            ))),
            Script::FailAfter(fragments) => {
                let mut items: Vec<Result<String, LlmError>> =
                    fragments.clone().into_iter().map(Ok).collect();
                items.push(Err(LlmError::Stream("connection reset".to_string())));
                Ok(Box::pin(stream::iter(items)))
            }
            Script::Unreachable => Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }
}
