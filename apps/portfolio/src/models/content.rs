use serde::{Deserialize, Serialize};

/// Outbound links shown in the hero, about and contact sections.
/// Every link is optional; absent ones are omitted or rendered disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileLinks {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    #[serde(default)]
    pub links: ProfileLinks,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

impl Profile {
    /// First word of the display name, used wherever the copy addresses the person informally.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    pub location: String,
    pub points: Vec<String>,
    #[serde(default)]
    pub offer_letter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub period: String,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_working: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatTile {
    pub label: String,
    pub value: String,
    pub caption: String,
}

/// Free-form page copy that is not part of the profile record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCopy {
    pub hero_badge: String,
    pub hero_headline: Vec<String>,
    pub hero_tagline: String,
    pub about_intro: String,
    pub about_body: String,
    #[serde(default)]
    pub stats: Vec<StatTile>,
    pub contact_heading: Vec<String>,
    pub contact_pitch: String,
    pub footer_note: String,
}

/// Fixed strings used by the chat assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantCopy {
    /// Seeded as the first assistant turn the first time the widget opens.
    pub greeting: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Sole fragment of the fallback stream when a request cannot be opened.
    pub offline_message: String,
    /// Closing tone sentence of the system instruction.
    pub persona: String,
}
