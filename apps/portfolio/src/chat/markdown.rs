//! Restricted markdown used in chat turns.
//!
//! Only two constructs are recognised: `**bold**` spans (non-greedy, within a
//! line) and bullet lines (a trimmed line starting with `* `). Text is first
//! scanned into a block list; markup is emitted from the blocks, with every
//! piece of text escaped. Runs of blank lines collapse into one separator and
//! separators at either end are dropped.

use crate::render::html::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    List(Vec<Vec<Inline>>),
    /// Single blank separator between blocks.
    Break,
}

/// Classification of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    Item(Vec<Inline>),
    Text(Vec<Inline>),
}

pub fn classify(line: &str) -> Line {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Line::Blank
    } else if let Some(item) = trimmed.strip_prefix("* ") {
        Line::Item(parse_inline(item.trim_start()))
    } else {
        Line::Text(parse_inline(trimmed))
    }
}

/// Splits a line into text and bold spans. An unmatched `**` stays literal.
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };
        literal.push_str(&rest[..open]);
        let inner = &after_open[..close];
        if !inner.is_empty() {
            if !literal.is_empty() {
                spans.push(Inline::Text(std::mem::take(&mut literal)));
            }
            spans.push(Inline::Bold(inner.to_string()));
        }
        rest = &after_open[close + 2..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        spans.push(Inline::Text(literal));
    }
    spans
}

pub fn parse(content: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in content.split('\n') {
        match classify(line) {
            Line::Blank => {
                if !matches!(blocks.last(), None | Some(Block::Break)) {
                    blocks.push(Block::Break);
                }
            }
            Line::Item(spans) => match blocks.last_mut() {
                Some(Block::List(items)) => items.push(spans),
                _ => blocks.push(Block::List(vec![spans])),
            },
            Line::Text(spans) => blocks.push(Block::Paragraph(spans)),
        }
    }

    if matches!(blocks.last(), Some(Block::Break)) {
        blocks.pop();
    }
    blocks
}

fn inline_html(spans: &[Inline]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => escape(t),
            Inline::Bold(t) => format!("<strong>{}</strong>", escape(t)),
        })
        .collect()
}

pub fn blocks_to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(spans) => {
                html.push_str("<p>");
                html.push_str(&inline_html(spans));
                html.push_str("</p>");
            }
            Block::List(items) => {
                html.push_str("<ul>");
                for item in items {
                    html.push_str("<li>");
                    html.push_str(&inline_html(item));
                    html.push_str("</li>");
                }
                html.push_str("</ul>");
            }
            Block::Break => html.push_str("<br/>"),
        }
    }
    html
}

pub fn render_html(content: &str) -> String {
    blocks_to_html(&parse(content))
}

const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[0m";

/// Terminal rendering of inline spans. `styled` selects ANSI bold over plain text.
pub fn inline_terminal(spans: &[Inline], styled: bool) -> String {
    spans
        .iter()
        .map(|span| match span {
            Inline::Text(t) => t.clone(),
            Inline::Bold(t) if styled => format!("{BOLD_ON}{t}{BOLD_OFF}"),
            Inline::Bold(t) => t.clone(),
        })
        .collect()
}

/// Terminal rendering of one classified line; `None` for blank lines.
pub fn line_terminal(line: &Line, styled: bool) -> Option<String> {
    match line {
        Line::Blank => None,
        Line::Item(spans) => Some(format!("  • {}", inline_terminal(spans, styled))),
        Line::Text(spans) => Some(inline_terminal(spans, styled)),
    }
}

pub fn render_terminal(content: &str, styled: bool) -> String {
    let mut lines = Vec::new();
    for block in parse(content) {
        match block {
            Block::Paragraph(spans) => lines.push(inline_terminal(&spans, styled)),
            Block::List(items) => {
                for item in items {
                    lines.push(format!("  • {}", inline_terminal(&item, styled)));
                }
            }
            Block::Break => lines.push(String::new()),
        }
    }
    lines.join("\n")
}
