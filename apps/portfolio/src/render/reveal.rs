//! Entrance reveal. Each revealable element carries a one-way latch: it is
//! rendered hidden (unless pre-latched) and the page script flips it to
//! visible the first time it scrolls into view, never back.

pub const HIDDEN_CLASS: &str = "reveal-hidden";
pub const VISIBLE_CLASS: &str = "reveal-visible";

/// Fraction of an element that must intersect the viewport before it latches.
pub const THRESHOLD: f32 = 0.1;

/// Render-time state of a latch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealLatch {
    visible: bool,
}

impl RevealLatch {
    pub fn hidden() -> Self {
        Self { visible: false }
    }

    pub fn visible() -> Self {
        Self { visible: true }
    }

    pub fn class(&self) -> &'static str {
        if self.visible {
            VISIBLE_CLASS
        } else {
            HIDDEN_CLASS
        }
    }
}

/// Page script that latches hidden elements as they intersect the viewport.
/// Only the hidden→visible transition exists, and a latched element stops
/// being observed.
pub fn script() -> String {
    format!(
        r#"(function () {{
  var hidden = document.querySelectorAll('.{hidden}');
  if (!('IntersectionObserver' in window)) {{
    hidden.forEach(function (el) {{ el.classList.replace('{hidden}', '{visible}'); }});
    return;
  }}
  var observer = new IntersectionObserver(function (entries) {{
    entries.forEach(function (entry) {{
      if (entry.isIntersecting) {{
        entry.target.classList.replace('{hidden}', '{visible}');
        observer.unobserve(entry.target);
      }}
    }});
  }}, {{ threshold: {threshold} }});
  hidden.forEach(function (el) {{ observer.observe(el); }});
}})();"#,
        hidden = HIDDEN_CLASS,
        visible = VISIBLE_CLASS,
        threshold = THRESHOLD,
    )
}
