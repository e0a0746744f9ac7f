//! Section Renderer — one function per page section.
//!
//! Each function is a pure projection of the content store into an HTML
//! fragment. Text and attribute values are escaped at the point of emission;
//! absent optional fields become inert placeholders rather than dead links.

use super::html::{disabled_action, escape, external_href, external_link};
use super::reveal::RevealLatch;
use crate::content::ContentStore;
use crate::models::content::{Experience, Profile, Project};

/// Navigation label → section anchor, in page order.
pub const NAV_ITEMS: [(&str, &str); 5] = [
    ("System_Specs", "about"),
    ("Computation_Matrix", "skills"),
    ("Operational_History", "experience"),
    ("Production_Logs", "projects"),
    ("Open_Node", "contact"),
];

const FOOTER_LINKS: [(&str, &str); 3] = [
    ("Specs", "about"),
    ("History", "experience"),
    ("Logs", "projects"),
];

/// Technologies overlaid on a project image.
pub const MAX_IMAGE_BADGES: usize = 3;

const PLACEHOLDER_PHOTO_BASE: u64 = 1_550_000_000_000;

/// Image for a project card. Projects without one get a stable stock photo keyed by position.
pub fn project_image_url(project: &Project, index: usize) -> String {
    match &project.image_url {
        Some(url) if !url.trim().is_empty() => url.clone(),
        _ => format!(
            "https://images.unsplash.com/photo-{}?auto=format&fit=crop&q=80&w=600",
            PLACEHOLDER_PHOTO_BASE + index as u64
        ),
    }
}

/// `tel:` target keeping only digits and `+`.
pub fn tel_href(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{digits}")
}

fn section_header(title: &str, subtitle: &str, latch: RevealLatch) -> String {
    format!(
        r#"<div class="section-header {}"><p class="section-title">{}</p><h2>{}</h2></div>"#,
        latch.class(),
        escape(title),
        escape(subtitle)
    )
}

fn badges<'a>(labels: impl IntoIterator<Item = &'a String>) -> String {
    labels
        .into_iter()
        .map(|label| format!(r#"<span class="badge">{}</span>"#, escape(label)))
        .collect()
}

/// Social links that are present, in a fixed order.
fn social_links(profile: &Profile) -> String {
    let links = &profile.links;
    [
        ("GitHub", &links.github),
        ("LinkedIn", &links.linkedin),
        ("Instagram", &links.instagram),
    ]
    .into_iter()
    .filter_map(|(label, url)| {
        url.as_deref()
            .map(|url| external_link(url, "social", &escape(label)))
    })
    .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

pub fn nav(store: &ContentStore) -> String {
    let items: String = NAV_ITEMS
        .iter()
        .map(|(label, id)| format!(r##"<li><a href="#{id}">{}</a></li>"##, escape(label)))
        .collect();
    format!(
        r##"<nav class="site-nav"><a href="#hero" class="brand">{}</a><ul>{items}</ul></nav>"##,
        escape(store.profile.first_name())
    )
}

pub fn hero(store: &ContentStore, latch: RevealLatch) -> String {
    let site = &store.site;
    let headline: String = site
        .hero_headline
        .iter()
        .map(|line| format!("<span>{}</span>", escape(line)))
        .collect();

    let resume = match &store.profile.links.resume {
        Some(url) => external_link(url, "btn", "Resume"),
        None => disabled_action("btn", "Resume unavailable"),
    };

    format!(
        r##"<section id="hero" class="hero {reveal}"><span class="badge">{badge}</span><h1>{headline}</h1><p class="tagline">{tagline}</p><div class="actions"><a href="#projects" class="btn">View Logs</a>{resume}</div><div class="socials">{socials}</div></section>"##,
        reveal = latch.class(),
        badge = escape(&site.hero_badge),
        tagline = escape(&site.hero_tagline),
        socials = social_links(&store.profile),
    )
}

pub fn about(store: &ContentStore, latch: RevealLatch) -> String {
    let site = &store.site;
    let profile = &store.profile;

    let stats: String = site
        .stats
        .iter()
        .map(|tile| {
            format!(
                r#"<div class="stat {}"><p class="meta">{}</p><p class="value">{}</p><p class="meta">{}</p></div>"#,
                latch.class(),
                escape(&tile.label),
                escape(&tile.value),
                escape(&tile.caption)
            )
        })
        .collect();

    let education: String = store
        .educations
        .iter()
        .map(|edu| {
            let grade = edu
                .grade
                .as_deref()
                .map(|g| format!(r#"<p class="meta">{}</p>"#, escape(g)))
                .unwrap_or_default();
            format!(
                r#"<li class="{}"><strong>{}</strong><p>{} · {}</p>{grade}</li>"#,
                latch.class(),
                escape(&edu.degree),
                escape(&edu.school),
                escape(&edu.period)
            )
        })
        .collect();

    let hobbies: String = profile
        .hobbies
        .iter()
        .map(|h| format!("<li>{}</li>", escape(h)))
        .collect();

    format!(
        r#"<section id="about">{header}<div class="{reveal}"><p class="intro">{intro}</p><p>{body}</p><p>{summary}</p><p class="meta">{location}</p></div><div class="stats">{stats}</div><h3>Education</h3><ul class="education">{education}</ul><h3>Off duty</h3><ul class="hobbies">{hobbies}</ul></section>"#,
        header = section_header("System_Specs", "Architect_Identity", latch),
        reveal = latch.class(),
        intro = escape(&site.about_intro),
        body = escape(&site.about_body),
        summary = escape(&profile.summary),
        location = escape(&profile.location),
    )
}

pub fn skills(store: &ContentStore, latch: RevealLatch) -> String {
    let cards: String = store
        .skills
        .iter()
        .map(|category| {
            format!(
                r#"<div class="card {}"><h3>{}</h3><div>{}</div></div>"#,
                latch.class(),
                escape(&category.name),
                badges(&category.skills)
            )
        })
        .collect();

    format!(
        r#"<section id="skills">{}<div class="grid">{cards}</div></section>"#,
        section_header("Computation_Matrix", "Logic_Resource_Map", latch)
    )
}

fn experience_entry(exp: &Experience, latch: RevealLatch) -> String {
    let points: String = exp
        .points
        .iter()
        .map(|p| format!("<li>{}</li>", escape(p)))
        .collect();

    let offer = match &exp.offer_letter {
        Some(url) => external_link(url, "badge", "Offer letter"),
        None => disabled_action("badge", "Offer letter unavailable"),
    };

    format!(
        r#"<article class="entry {}"><h3>{}</h3><p class="company">{}</p><p class="meta">{} · {}</p><ul>{points}</ul>{offer}</article>"#,
        latch.class(),
        escape(&exp.role),
        escape(&exp.company),
        escape(&exp.period),
        escape(&exp.location)
    )
}

pub fn experience(store: &ContentStore, latch: RevealLatch) -> String {
    let entries: String = store
        .experiences
        .iter()
        .map(|exp| experience_entry(exp, latch))
        .collect();

    format!(
        r#"<section id="experience">{}<div class="timeline">{entries}</div></section>"#,
        section_header("Operational_History", "Execution_Logs", latch)
    )
}

fn project_card(project: &Project, index: usize, latch: RevealLatch) -> String {
    let live = if project.is_working {
        r#"<span class="badge badge-live">Live</span>"#
    } else {
        ""
    };

    let action = match &project.link {
        Some(url) => external_link(url, "btn", "Open project"),
        None => disabled_action("btn", "Private repo"),
    };

    format!(
        r#"<article class="card project {reveal}"><div class="project-media"><img src="{src}" alt="{alt}" loading="lazy"><div class="badges">{overlay}</div></div>{live}<h3>{title}</h3><p>{description}</p><div class="technologies">{all}</div>{action}</article>"#,
        reveal = latch.class(),
        src = external_href(&project_image_url(project, index)),
        alt = escape(&project.title),
        overlay = badges(project.technologies.iter().take(MAX_IMAGE_BADGES)),
        title = escape(&project.title),
        description = escape(&project.description),
        all = badges(&project.technologies),
    )
}

pub fn projects(store: &ContentStore, latch: RevealLatch) -> String {
    let cards: String = store
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| project_card(project, i, latch))
        .collect();

    format!(
        r#"<section id="projects">{}<div class="grid">{cards}</div></section>"#,
        section_header("Production_Logs", "System_Outputs", latch)
    )
}

pub fn contact(store: &ContentStore, latch: RevealLatch) -> String {
    let profile = &store.profile;
    let heading: String = store
        .site
        .contact_heading
        .iter()
        .map(|line| format!("<span>{}</span>", escape(line)))
        .collect();

    format!(
        r#"<section id="contact" class="{reveal}"><h2>{heading}</h2><p>{pitch}</p><p><a href="mailto:{email}" class="btn">{email}</a><a href="{tel}" class="btn">{phone}</a></p><p class="meta">{location}</p><div class="socials">{socials}</div></section>"#,
        reveal = latch.class(),
        pitch = escape(&store.site.contact_pitch),
        email = escape(&profile.email),
        tel = escape(&tel_href(&profile.phone)),
        phone = escape(&profile.phone),
        location = escape(&profile.location),
        socials = social_links(profile),
    )
}

pub fn footer(store: &ContentStore) -> String {
    let links: String = FOOTER_LINKS
        .iter()
        .map(|(label, id)| format!(r##"<a href="#{id}">{}</a>"##, escape(label)))
        .collect();

    format!(
        r#"<footer><p>{} · {}</p><nav>{links}</nav></footer>"#,
        escape(&store.profile.name),
        escape(&store.site.footer_note)
    )
}
