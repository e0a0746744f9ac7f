// Escaping helpers. Every piece of content reaches the page through one of these.

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `href` for an external link. Only http(s) URLs are emitted as-is; anything
/// else (e.g. `javascript:`) collapses to `#`.
pub fn external_href(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        escape(trimmed)
    } else {
        "#".to_string()
    }
}

/// Anchor that opens in a new tab.
pub fn external_link(url: &str, class: &str, label_html: &str) -> String {
    format!(
        r#"<a href="{}" class="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        external_href(url),
        escape(class),
        label_html
    )
}

/// Inert stand-in for an action whose target is absent.
pub fn disabled_action(class: &str, label: &str) -> String {
    format!(
        r#"<span class="{} is-disabled" aria-disabled="true">{}</span>"#,
        escape(class),
        escape(label)
    )
}
