// Inline stylesheets. The rendered page and the exported transcript are single files.

pub const SITE_CSS: &str = r#"
:root { --bg: #050505; --fg: #e5e5e5; --muted: #8a8a8a; --accent: #22d3ee; --line: #1f1f1f; }
* { box-sizing: border-box; }
html { scroll-behavior: smooth; }
body { margin: 0; background: var(--bg); color: var(--fg); font-family: ui-monospace, SFMono-Regular, Menlo, monospace; line-height: 1.6; }
a { color: inherit; }
nav.site-nav { position: sticky; top: 0; display: flex; justify-content: space-between; padding: 1rem 2rem; background: rgba(5,5,5,.9); border-bottom: 1px solid var(--line); z-index: 10; }
nav.site-nav ul { display: flex; gap: 1.5rem; list-style: none; margin: 0; padding: 0; }
nav.site-nav a { text-decoration: none; font-size: .8rem; letter-spacing: .1em; color: var(--muted); }
nav.site-nav a:hover { color: var(--accent); }
section { max-width: 72rem; margin: 0 auto; padding: 6rem 2rem; }
.section-header .section-title { font-size: .75rem; letter-spacing: .3em; color: var(--accent); text-transform: uppercase; }
.section-header h2 { font-size: 2.5rem; margin: .25rem 0 2rem; }
.hero h1 { font-size: clamp(2.5rem, 8vw, 6rem); line-height: 1; margin: 1rem 0; }
.hero h1 span { display: block; }
.badge { display: inline-block; font-size: .7rem; letter-spacing: .15em; text-transform: uppercase; border: 1px solid var(--line); padding: .2rem .6rem; margin: 0 .3rem .3rem 0; }
.badge-live { border-color: #10b981; color: #10b981; }
.btn { display: inline-block; padding: .6rem 1.2rem; border: 1px solid var(--accent); text-decoration: none; margin-right: .5rem; }
.is-disabled { opacity: .4; cursor: not-allowed; border-style: dashed; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(10rem, 1fr)); gap: 1rem; }
.stat { border: 1px solid var(--line); padding: 1rem; }
.stat .value { font-size: 1.8rem; color: var(--accent); }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(18rem, 1fr)); gap: 1.5rem; }
.card { border: 1px solid var(--line); padding: 1.5rem; }
.project-media { position: relative; }
.project-media img { width: 100%; aspect-ratio: 16 / 9; object-fit: cover; }
.project-media .badges { position: absolute; left: .5rem; bottom: .5rem; }
.timeline .entry { border-left: 2px solid var(--line); padding-left: 1.5rem; margin-bottom: 2.5rem; }
.meta { color: var(--muted); font-size: .8rem; }
footer { border-top: 1px solid var(--line); padding: 2rem; text-align: center; color: var(--muted); font-size: .8rem; }
footer a { margin: 0 .75rem; }
.reveal-hidden { opacity: 0; transform: translateY(1.5rem); transition: opacity .7s ease, transform .7s ease; }
.reveal-visible { opacity: 1; transform: none; transition: opacity .7s ease, transform .7s ease; }
"#;

pub const TRANSCRIPT_CSS: &str = r#"
body { margin: 0; background: #0a0a0a; color: #e5e5e5; font-family: ui-monospace, Menlo, monospace; }
main.transcript { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
.turn { border: 1px solid #1f1f1f; padding: .75rem 1rem; margin-bottom: 1rem; }
.turn header { font-size: .7rem; letter-spacing: .2em; text-transform: uppercase; color: #8a8a8a; }
.turn-user { border-color: #22d3ee; }
"#;
