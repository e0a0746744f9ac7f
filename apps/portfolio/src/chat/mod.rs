pub mod markdown;
pub mod terminal;
pub mod widget;

use crate::models::chat::{ConversationTurn, Role};
use crate::render::assets::TRANSCRIPT_CSS;
use crate::render::html::escape;

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// Transcript as HTML, oldest turn first. Turn bodies go through the markdown subset.
pub fn transcript_html(turns: &[ConversationTurn]) -> String {
    let mut body = String::new();
    for turn in turns {
        body.push_str(&format!(
            r#"<article class="turn turn-{role}"><header>{label}</header><div class="turn-body">{content}</div></article>"#,
            role = turn.role.as_str(),
            label = escape(role_label(turn.role)),
            content = markdown::render_html(&turn.content),
        ));
        body.push('\n');
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Chat transcript</title>\n<style>{TRANSCRIPT_CSS}</style>\n</head>\n<body>\n<main class=\"transcript\">\n{body}</main>\n</body>\n</html>\n"
    )
}
