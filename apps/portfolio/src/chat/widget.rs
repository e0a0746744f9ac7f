//! Chat Widget — owns the transcript and enforces one outstanding request.
//!
//! Visibility and the streaming phase are tracked separately: closing the
//! widget while a reply streams only hides it, and the stream keeps draining
//! into the transcript.
//!
//! States: `Closed` → `OpenIdle` → `OpenAwaitingFirstChunk` → `OpenStreaming` → `OpenIdle`.

use futures::StreamExt;
use tracing::{debug, warn};

use crate::llm_client::{FragmentStream, LlmError};
use crate::models::chat::{ConversationTurn, Role};
use crate::models::content::AssistantCopy;

/// Replaces the in-progress reply when its stream fails part way.
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Closed,
    OpenIdle,
    OpenAwaitingFirstChunk,
    OpenStreaming,
}

/// Outcome of applying one stream item with `ChatWidget::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyEvent {
    /// Text was appended; more may follow.
    Grew,
    /// The stream ended; the reply is final.
    Finished,
    /// The stream failed; the reply now holds the apology.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    AwaitingFirstChunk,
    Streaming,
}

#[derive(Debug, Clone)]
pub struct ChatWidget {
    transcript: Vec<ConversationTurn>,
    visible: bool,
    phase: Phase,
    input: String,
    greeting: String,
    suggestions: Vec<String>,
}

impl ChatWidget {
    pub fn new(copy: &AssistantCopy) -> Self {
        Self {
            transcript: Vec::new(),
            visible: false,
            phase: Phase::Idle,
            input: String::new(),
            greeting: copy.greeting.clone(),
            suggestions: copy.suggestions.clone(),
        }
    }

    pub fn state(&self) -> WidgetState {
        match (self.visible, self.phase) {
            (false, _) => WidgetState::Closed,
            (true, Phase::Idle) => WidgetState::OpenIdle,
            (true, Phase::AwaitingFirstChunk) => WidgetState::OpenAwaitingFirstChunk,
            (true, Phase::Streaming) => WidgetState::OpenStreaming,
        }
    }

    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    /// True while a reply is outstanding, whether or not the widget is visible.
    pub fn is_thinking(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Shows the widget. The greeting is seeded only into an empty transcript,
    /// so it appears once per session.
    pub fn open(&mut self) {
        self.visible = true;
        if self.transcript.is_empty() {
            self.transcript
                .push(ConversationTurn::assistant(self.greeting.clone()));
        }
    }

    /// Hides the widget. An in-flight reply keeps streaming into the transcript.
    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.accepts_submissions() && !self.input.trim().is_empty()
    }

    fn accepts_submissions(&self) -> bool {
        self.visible && self.phase == Phase::Idle
    }

    /// Canned prompts, offered only before the first exchange.
    pub fn suggestions(&self) -> &[String] {
        if self.accepts_submissions() && self.transcript.len() == 1 {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// Submits the typed input. On acceptance the input box is cleared.
    pub fn submit_input(&mut self) -> Option<Vec<ConversationTurn>> {
        let text = self.input.clone();
        let history = self.submit(&text)?;
        self.input.clear();
        Some(history)
    }

    /// Submits the suggestion at `index`, if suggestions are currently offered.
    pub fn submit_suggestion(&mut self, index: usize) -> Option<Vec<ConversationTurn>> {
        let prompt = self.suggestions().get(index)?.clone();
        self.submit(&prompt)
    }

    /// Appends a user turn and an empty placeholder assistant turn.
    ///
    /// Returns the history to send (everything before the placeholder), or
    /// `None` when the widget is hidden, busy, or `text` is blank. Rejection
    /// leaves the transcript untouched.
    pub fn submit(&mut self, text: &str) -> Option<Vec<ConversationTurn>> {
        let text = text.trim();
        if text.is_empty() || !self.accepts_submissions() {
            debug!(
                "Submission rejected (state={:?}, blank={})",
                self.state(),
                text.is_empty()
            );
            return None;
        }

        self.transcript.push(ConversationTurn::user(text));
        let history = self.transcript.clone();
        self.transcript.push(ConversationTurn::assistant(String::new()));
        self.phase = Phase::AwaitingFirstChunk;
        Some(history)
    }

    fn in_progress_turn(&mut self) -> Option<&mut ConversationTurn> {
        if self.phase == Phase::Idle {
            return None;
        }
        self.transcript
            .last_mut()
            .filter(|turn| turn.role == Role::Assistant)
    }

    /// Appends a fragment to the in-progress reply. Ignored when idle.
    pub fn push_fragment(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        let Some(turn) = self.in_progress_turn() else {
            debug!("Dropping fragment with no reply in progress");
            return;
        };
        turn.content.push_str(fragment);
        self.phase = Phase::Streaming;
    }

    /// Ends the in-progress reply. A reply that received nothing gets the apology.
    pub fn finish(&mut self) {
        if let Some(turn) = self.in_progress_turn() {
            if turn.content.is_empty() {
                warn!("Reply stream ended without content");
                turn.content = APOLOGY.to_string();
            }
        }
        self.phase = Phase::Idle;
    }

    /// Replaces the in-progress reply wholesale with the apology.
    pub fn fail(&mut self) {
        if let Some(turn) = self.in_progress_turn() {
            turn.content = APOLOGY.to_string();
        }
        self.phase = Phase::Idle;
    }

    /// Applies one item pulled from a reply stream: `Some(Ok)` appends,
    /// `Some(Err)` fails the reply, `None` (end of stream) finishes it.
    /// After `Finished` or `Failed` the rest of the stream must be abandoned.
    pub fn apply(&mut self, item: Option<Result<String, LlmError>>) -> ReplyEvent {
        match item {
            Some(Ok(fragment)) => {
                self.push_fragment(&fragment);
                ReplyEvent::Grew
            }
            Some(Err(e)) => {
                warn!("Reply stream failed: {e}");
                self.fail();
                ReplyEvent::Failed
            }
            None => {
                self.finish();
                ReplyEvent::Finished
            }
        }
    }

    /// Applies a whole stream until it finishes or fails.
    pub async fn drain(&mut self, mut stream: FragmentStream) {
        while self.apply(stream.next().await) == ReplyEvent::Grew {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::stream;

    use super::*;
    use crate::content::ContentStore;
    use crate::llm_client::mock::ScriptedModel;
    use crate::llm_client::LlmClient;

    fn copy() -> AssistantCopy {
        ContentStore::builtin().unwrap().assistant
    }

    fn open_widget() -> ChatWidget {
        let mut widget = ChatWidget::new(&copy());
        widget.open();
        widget
    }

    fn scripted(items: Vec<Result<&str, LlmError>>) -> FragmentStream {
        Box::pin(stream::iter(
            items
                .into_iter()
                .map(|i| i.map(str::to_string))
                .collect::<Vec<_>>(),
        ))
    }

    #[test]
    fn test_starts_closed_and_empty() {
        let widget = ChatWidget::new(&copy());
        assert_eq!(widget.state(), WidgetState::Closed);
        assert!(widget.transcript().is_empty());
    }

    #[test]
    fn test_open_seeds_greeting_once() {
        let greeting = copy().greeting;
        let mut widget = ChatWidget::new(&copy());

        widget.open();
        assert_eq!(widget.state(), WidgetState::OpenIdle);
        assert_eq!(widget.transcript(), &[ConversationTurn::assistant(greeting.clone())]);

        widget.close();
        widget.open();
        widget.open();
        assert_eq!(widget.transcript().len(), 1);
    }

    #[test]
    fn test_submit_appends_user_then_placeholder() {
        let mut widget = open_widget();
        let history = widget.submit("  What is MPAY?  ").unwrap();

        assert_eq!(widget.state(), WidgetState::OpenAwaitingFirstChunk);
        assert_eq!(widget.transcript().len(), 3);
        assert_eq!(widget.transcript()[1], ConversationTurn::user("What is MPAY?"));
        assert_eq!(widget.transcript()[2], ConversationTurn::assistant(""));
        // The placeholder is not part of what gets sent.
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().role, Role::User);
    }

    #[test]
    fn test_blank_and_closed_submissions_rejected() {
        let mut widget = open_widget();
        assert!(widget.submit("   \n\t").is_none());
        assert_eq!(widget.transcript().len(), 1);

        widget.close();
        assert!(widget.submit("hello").is_none());
        assert_eq!(widget.transcript().len(), 1);
    }

    #[test]
    fn test_no_submission_while_streaming() {
        let mut widget = open_widget();
        widget.submit("first").unwrap();
        assert!(widget.submit("second").is_none());

        widget.push_fragment("partial");
        assert_eq!(widget.state(), WidgetState::OpenStreaming);
        assert!(widget.submit("third").is_none());
        assert_eq!(widget.transcript().len(), 3);

        widget.finish();
        assert!(widget.submit("fourth").is_some());
        assert_eq!(widget.transcript().len(), 5);
    }

    #[test]
    fn test_can_submit_tracks_input_and_phase() {
        let mut widget = open_widget();
        assert!(!widget.can_submit());

        widget.set_input("  ");
        assert!(!widget.can_submit());

        widget.set_input("hi");
        assert!(widget.can_submit());

        widget.submit_input().unwrap();
        assert_eq!(widget.input, "");
        widget.set_input("again");
        assert!(!widget.can_submit());
    }

    #[test]
    fn test_suggestions_only_before_first_exchange() {
        let mut widget = open_widget();
        assert_eq!(widget.suggestions().len(), 4);

        let history = widget.submit_suggestion(1).unwrap();
        assert_eq!(history.last().unwrap().content, "Tell me about the MPAY project.");
        assert!(widget.suggestions().is_empty());
        assert!(widget.submit_suggestion(0).is_none());

        widget.finish();
        assert!(widget.suggestions().is_empty());
    }

    #[test]
    fn test_out_of_range_suggestion_rejected() {
        let mut widget = open_widget();
        assert!(widget.submit_suggestion(99).is_none());
        assert_eq!(widget.transcript().len(), 1);
    }

    #[test]
    fn test_fragments_dropped_when_idle() {
        let mut widget = open_widget();
        widget.push_fragment("stray");
        assert_eq!(widget.transcript()[0].content, copy().greeting);
        assert_eq!(widget.state(), WidgetState::OpenIdle);
    }

    #[test]
    fn test_empty_reply_never_left_dangling() {
        let mut widget = open_widget();
        widget.submit("hi").unwrap();
        widget.push_fragment("");
        assert_eq!(widget.state(), WidgetState::OpenAwaitingFirstChunk);
        widget.finish();
        assert_eq!(widget.transcript()[2].content, APOLOGY);
    }

    #[tokio::test]
    async fn test_drain_concatenates_in_order() {
        let mut widget = open_widget();
        widget.submit("skills?").unwrap();

        let fragments = ["**Py", "thon** and", "\n* C", "++"];
        widget
            .drain(scripted(fragments.iter().map(|f| Ok(*f)).collect()))
            .await;

        assert_eq!(widget.state(), WidgetState::OpenIdle);
        assert_eq!(widget.transcript()[2].content, fragments.concat());
    }

    #[tokio::test]
    async fn test_drain_failure_replaces_partial_content() {
        for received in 0..3 {
            let mut widget = open_widget();
            widget.submit("hi").unwrap();

            let mut items: Vec<Result<&str, LlmError>> = ["a", "b", "c"][..received]
                .iter()
                .map(|f| Ok(*f))
                .collect();
            items.push(Err(LlmError::Stream("reset".to_string())));
            items.push(Ok("after error"));

            widget.drain(scripted(items)).await;
            assert_eq!(widget.transcript()[2].content, APOLOGY);
            assert_eq!(widget.state(), WidgetState::OpenIdle);
        }
    }

    #[tokio::test]
    async fn test_closed_widget_keeps_draining() {
        let mut widget = open_widget();
        widget.submit("hi").unwrap();
        widget.close();
        assert_eq!(widget.state(), WidgetState::Closed);
        assert!(widget.is_thinking());

        widget.drain(scripted(vec![Ok("still "), Ok("arrives")])).await;
        assert!(!widget.is_thinking());

        widget.open();
        assert_eq!(widget.transcript().len(), 3);
        assert_eq!(widget.transcript()[2].content, "still arrives");
    }

    #[tokio::test]
    async fn test_unreachable_model_yields_offline_message() {
        let store = ContentStore::builtin().unwrap();
        let client = LlmClient::new(Arc::new(ScriptedModel::unreachable()), &store);
        let mut widget = ChatWidget::new(&store.assistant);
        widget.open();

        let history = widget.submit("hi").unwrap();
        widget.drain(client.stream_chat(&history).await).await;

        assert_eq!(widget.transcript()[2].content, store.assistant.offline_message);
        assert_eq!(widget.state(), WidgetState::OpenIdle);
        // Still usable afterwards.
        assert!(widget.submit("again").is_some());
    }

    #[tokio::test]
    async fn test_round_trip_through_client_sends_greeting_and_question() {
        let store = ContentStore::builtin().unwrap();
        let model = Arc::new(ScriptedModel::fragments(&["Hello", " back"]));
        let client = LlmClient::new(model.clone(), &store);
        let mut widget = ChatWidget::new(&store.assistant);
        widget.open();

        let history = widget.submit("hello").unwrap();
        widget.drain(client.stream_chat(&history).await).await;

        assert_eq!(widget.transcript()[2].content, "Hello back");
        let sent = &model.requests()[0].turns;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].content, store.assistant.greeting);
        assert_eq!(sent[1].content, "hello");
    }

    #[tokio::test]
    async fn test_failing_model_mid_stream_yields_apology() {
        let store = ContentStore::builtin().unwrap();
        let client = LlmClient::new(Arc::new(ScriptedModel::fail_after(&["par", "tial"])), &store);
        let mut widget = ChatWidget::new(&store.assistant);
        widget.open();

        let history = widget.submit("hi").unwrap();
        widget.drain(client.stream_chat(&history).await).await;
        assert_eq!(widget.transcript()[2].content, APOLOGY);
    }

    #[test]
    fn test_apply_reports_each_step() {
        let mut widget = open_widget();
        widget.submit("hi").unwrap();

        assert_eq!(widget.apply(Some(Ok("a".to_string()))), ReplyEvent::Grew);
        assert_eq!(widget.state(), WidgetState::OpenStreaming);
        assert_eq!(widget.apply(None), ReplyEvent::Finished);
        assert_eq!(widget.transcript()[2].content, "a");
        assert!(!widget.is_thinking());

        widget.submit("again").unwrap();
        let failed = widget.apply(Some(Err(LlmError::Stream("reset".to_string()))));
        assert_eq!(failed, ReplyEvent::Failed);
        assert_eq!(widget.transcript()[4].content, APOLOGY);
    }
}
