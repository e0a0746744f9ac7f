/// Section Renderer — projects the content store into a single static page.
///
/// The page is self-contained: inline stylesheet, inline reveal script, no
/// external assets besides images and outbound links.
use std::path::{Path, PathBuf};

use tracing::info;

use crate::content::ContentStore;
use crate::errors::AppError;

pub mod assets;
pub mod html;
pub mod reveal;
pub mod sections;

use reveal::RevealLatch;

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Pre-latch every reveal so the page reads fully without scripting.
    pub reveal_all: bool,
}

impl RenderOptions {
    fn initial_latch(&self) -> RevealLatch {
        if self.reveal_all {
            RevealLatch::visible()
        } else {
            RevealLatch::hidden()
        }
    }
}

pub fn render_page(store: &ContentStore, options: &RenderOptions) -> String {
    let latch = options.initial_latch();
    let profile = &store.profile;

    let body = [
        sections::nav(store),
        "<main>".to_string(),
        sections::hero(store, latch),
        sections::about(store, latch),
        sections::skills(store, latch),
        sections::experience(store, latch),
        sections::projects(store, latch),
        sections::contact(store, latch),
        "</main>".to_string(),
        sections::footer(store),
    ]
    .join("\n");

    // With every latch already set there is nothing left to observe.
    let script = if options.reveal_all {
        String::new()
    } else {
        format!("<script>{}</script>\n", reveal::script())
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{title}</title>\n<meta name=\"description\" content=\"{description}\">\n<style>{css}</style>\n</head>\n<body>\n{body}\n{script}</body>\n</html>\n",
        title = html::escape(&format!("{} | {}", profile.name, profile.title)),
        description = html::escape(&profile.summary),
        css = assets::SITE_CSS,
    )
}

/// Creates `out_dir` if needed and writes `index.html` into it.
pub fn write_site(
    store: &ContentStore,
    out_dir: &Path,
    options: &RenderOptions,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(out_dir)?;
    let page = render_page(store, options);
    let path = out_dir.join("index.html");
    std::fs::write(&path, &page)?;

    info!(
        "Wrote {} ({} bytes, reveal_all={})",
        path.display(),
        page.len(),
        options.reveal_all
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_sections_in_order() {
        let page = render_page(&ContentStore::builtin().unwrap(), &RenderOptions::default());
        let order = [
            "<nav class=\"site-nav\"",
            "id=\"hero\"",
            "id=\"about\"",
            "id=\"skills\"",
            "id=\"experience\"",
            "id=\"projects\"",
            "id=\"contact\"",
            "<footer>",
        ];
        let positions: Vec<usize> = order.iter().map(|s| page.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_render_includes_reveal_script() {
        let page = render_page(&ContentStore::builtin().unwrap(), &RenderOptions::default());
        assert!(page.contains("IntersectionObserver"));
        assert!(page.contains("class=\"card reveal-hidden\""));
    }

    #[test]
    fn test_static_render_is_fully_revealed() {
        let options = RenderOptions { reveal_all: true };
        let page = render_page(&ContentStore::builtin().unwrap(), &options);
        assert!(!page.contains("<script>"));
        assert!(!page.contains("class=\"card reveal-hidden\""));
    }

    #[test]
    fn test_write_site_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("site");

        let path = write_site(
            &ContentStore::builtin().unwrap(),
            &out,
            &RenderOptions::default(),
        )
        .unwrap();

        assert_eq!(path, out.join("index.html"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("Shahid Himmat Shaikh"));
    }
}
