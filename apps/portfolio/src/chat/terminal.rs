// Line-based terminal front end over `ChatWidget`.
//
// stdin lines and the in-flight fragment stream are multiplexed with
// `tokio::select!`, so `/close` takes effect while a reply is still arriving.
// Replies are printed line by line as soon as a line is complete.

use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use super::markdown::{classify, line_terminal, render_terminal};
use super::widget::{ChatWidget, ReplyEvent, APOLOGY};
use crate::errors::AppError;
use crate::llm_client::{FragmentStream, LlmClient, LlmError};
use crate::models::chat::{ConversationTurn, Role};

const USER_LABEL: &str = "you ›";
const ASSISTANT_LABEL: &str = "assistant ›";

const HELP: &str = "\
Commands:
  /open        show the chat (and everything received while hidden)
  /close       hide the chat; a reply in progress keeps arriving
  /suggest N   ask suggested question N
  /help        show this help
  /quit        leave once the current reply has finished
Any other line is sent as a question.";

/// Printing state for the reply currently streaming to the screen.
#[derive(Debug, Default)]
struct LiveReply {
    consumed: usize,
    started: bool,
    pending_blank: bool,
}

impl LiveReply {
    fn emit(&mut self, raw: &str, styled: bool, out: &mut Vec<String>) {
        match line_terminal(&classify(raw), styled) {
            None => self.pending_blank = self.started,
            Some(line) => {
                if self.pending_blank {
                    out.push(String::new());
                    self.pending_blank = false;
                }
                out.push(line);
                self.started = true;
            }
        }
    }

    /// Rendered form of every newline-terminated line not yet printed.
    fn complete_lines(&mut self, content: &str, styled: bool) -> Vec<String> {
        let rest = content.get(self.consumed..).unwrap_or("");
        let Some(end) = rest.rfind('\n') else {
            return Vec::new();
        };
        self.consumed += end + 1;

        let mut out = Vec::new();
        for raw in rest[..end].split('\n') {
            self.emit(raw, styled, &mut out);
        }
        out
    }

    /// Rendered form of whatever is left, terminated or not.
    fn remaining_lines(&mut self, content: &str, styled: bool) -> Vec<String> {
        let rest = content.get(self.consumed..).unwrap_or("");
        self.consumed = content.len();

        let mut out = Vec::new();
        for raw in rest.split('\n') {
            self.emit(raw, styled, &mut out);
        }
        out
    }
}

pub struct TerminalChat<W> {
    client: LlmClient,
    widget: ChatWidget,
    out: W,
    styled: bool,
    live: LiveReply,
}

async fn next_item(stream: &mut Option<FragmentStream>) -> Option<Result<String, LlmError>> {
    match stream {
        Some(s) => s.next().await,
        None => std::future::pending().await,
    }
}

impl<W: AsyncWrite + Unpin> TerminalChat<W> {
    pub fn new(client: LlmClient, widget: ChatWidget, out: W, styled: bool) -> Self {
        Self {
            client,
            widget,
            out,
            styled,
            live: LiveReply::default(),
        }
    }

    pub fn widget(&self) -> &ChatWidget {
        &self.widget
    }

    async fn write_line(&mut self, line: &str) -> Result<(), AppError> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        Ok(())
    }

    async fn write_lines(&mut self, lines: Vec<String>) -> Result<(), AppError> {
        for line in lines {
            self.write_line(&line).await?;
        }
        self.out.flush().await?;
        Ok(())
    }

    /// Runs until input ends (EOF or `/quit`) and no reply is outstanding.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), AppError> {
        let mut lines = input.lines();
        let mut stream: Option<FragmentStream> = None;
        let mut input_done = false;

        self.open().await?;

        loop {
            if input_done && stream.is_none() {
                break;
            }

            tokio::select! {
                line = lines.next_line(), if !input_done => {
                    match line? {
                        Some(line) => {
                            if let Some(history) = self.handle_line(&line, &mut input_done).await? {
                                stream = Some(self.client.stream_chat(&history).await);
                            }
                        }
                        None => {
                            debug!("stdin closed");
                            input_done = true;
                        }
                    }
                }
                item = next_item(&mut stream) => {
                    let event = self.widget.apply(item);
                    if event != ReplyEvent::Grew {
                        stream = None;
                    }
                    if self.widget.is_open() {
                        let content = self.current_reply();
                        let output = match event {
                            ReplyEvent::Grew => self.live.complete_lines(&content, self.styled),
                            ReplyEvent::Finished => self.live.remaining_lines(&content, self.styled),
                            ReplyEvent::Failed => vec![APOLOGY.to_string()],
                        };
                        self.write_lines(output).await?;
                    }
                }
            }
        }

        info!(
            "Chat session ended with {} turns",
            self.widget.transcript().len()
        );
        Ok(())
    }

    fn current_reply(&self) -> String {
        self.widget
            .transcript()
            .last()
            .filter(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.content.clone())
            .unwrap_or_default()
    }

    /// Returns the history to send when the line was an accepted submission.
    async fn handle_line(
        &mut self,
        line: &str,
        input_done: &mut bool,
    ) -> Result<Option<Vec<ConversationTurn>>, AppError> {
        let trimmed = line.trim();
        let mut words = trimmed.split_whitespace();

        match words.next() {
            None => Ok(None),
            Some("/quit") => {
                if self.widget.is_thinking() {
                    self.write_lines(vec!["(waiting for the current reply to finish)".to_string()])
                        .await?;
                }
                *input_done = true;
                Ok(None)
            }
            Some("/help") => {
                self.write_lines(HELP.lines().map(str::to_string).collect())
                    .await?;
                Ok(None)
            }
            Some("/open") => {
                if !self.widget.is_open() {
                    self.open().await?;
                }
                Ok(None)
            }
            Some("/close") => {
                self.widget.close();
                self.write_lines(vec!["(chat hidden, /open to show it again)".to_string()])
                    .await?;
                Ok(None)
            }
            Some("/suggest") => {
                let index = words
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1));
                let history = index.and_then(|i| self.widget.submit_suggestion(i));
                match history {
                    Some(history) => {
                        let question = history
                            .last()
                            .map(|turn| turn.content.clone())
                            .unwrap_or_default();
                        self.begin_reply(Some(&question)).await?;
                        Ok(Some(history))
                    }
                    None => {
                        self.write_lines(vec!["(no such suggestion right now)".to_string()])
                            .await?;
                        Ok(None)
                    }
                }
            }
            Some(_) => {
                self.widget.set_input(trimmed);
                if !self.widget.can_submit() {
                    let note = if !self.widget.is_open() {
                        "(chat is hidden, /open first)"
                    } else {
                        "(still answering, please wait)"
                    };
                    self.widget.set_input("");
                    self.write_lines(vec![note.to_string()]).await?;
                    return Ok(None);
                }
                let history = self.widget.submit_input();
                if history.is_some() {
                    self.begin_reply(None).await?;
                }
                Ok(history)
            }
        }
    }

    async fn begin_reply(&mut self, echoed_question: Option<&str>) -> Result<(), AppError> {
        self.live = LiveReply::default();
        let mut lines = Vec::new();
        if let Some(question) = echoed_question {
            lines.push(format!("{USER_LABEL} {question}"));
        }
        lines.push(ASSISTANT_LABEL.to_string());
        self.write_lines(lines).await
    }

    /// Shows the widget and replays the transcript, including any reply that
    /// kept arriving while it was hidden.
    async fn open(&mut self) -> Result<(), AppError> {
        self.widget.open();

        let turns = self.widget.transcript().to_vec();
        let in_progress = self.widget.is_thinking();
        let finished = if in_progress {
            turns.len().saturating_sub(1)
        } else {
            turns.len()
        };

        let mut lines = Vec::new();
        for turn in &turns[..finished] {
            lines.extend(self.turn_lines(turn));
        }
        if in_progress {
            lines.push(ASSISTANT_LABEL.to_string());
            self.live = LiveReply::default();
            let content = self.current_reply();
            lines.extend(self.live.complete_lines(&content, self.styled));
        } else {
            let suggestions = self.widget.suggestions();
            if !suggestions.is_empty() {
                lines.push("Try one of these with /suggest N:".to_string());
                lines.extend(
                    suggestions
                        .iter()
                        .enumerate()
                        .map(|(i, s)| format!("  [{}] {}", i + 1, s)),
                );
            }
        }
        self.write_lines(lines).await
    }

    fn turn_lines(&self, turn: &ConversationTurn) -> Vec<String> {
        match turn.role {
            Role::User => vec![format!("{USER_LABEL} {}", turn.content)],
            Role::Assistant => {
                let mut lines = vec![ASSISTANT_LABEL.to_string()];
                let body = render_terminal(&turn.content, self.styled);
                lines.extend(body.lines().map(str::to_string));
                lines
            }
        }
    }
}
