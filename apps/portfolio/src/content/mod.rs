//! Content Store — the immutable record every view and the system
//! instruction are derived from.
//!
//! Loaded once at startup (embedded JSON by default, or a user supplied file)
//! and passed around by reference. Nothing mutates it after `load`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::content::{
    AssistantCopy, Education, Experience, Profile, Project, SiteCopy, SkillCategory,
};

pub mod completeness;

const BUILTIN_CONTENT: &str = include_str!("../../content/portfolio.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentStore {
    pub profile: Profile,
    pub skills: Vec<SkillCategory>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub educations: Vec<Education>,
    pub site: SiteCopy,
    pub assistant: AssistantCopy,
}

impl ContentStore {
    /// The content shipped with the binary.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let store: ContentStore = serde_json::from_str(raw)?;
        store.validate()?;
        Ok(store)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Loads from `path` when given, otherwise falls back to the builtin content.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let store = match path {
            Some(p) => {
                info!("Loading portfolio content from {}", p.display());
                Self::from_path(p)?
            }
            None => Self::builtin()?,
        };
        info!(
            "Content loaded: {} skill categories, {} experiences, {} projects, {} educations",
            store.skills.len(),
            store.experiences.len(),
            store.projects.len(),
            store.educations.len()
        );
        Ok(store)
    }

    /// Rejects records that would render or prompt as nonsense.
    /// Empty optional sections are allowed; empty identifying fields are not.
    fn validate(&self) -> Result<(), AppError> {
        if self.profile.name.trim().is_empty() {
            return Err(AppError::Content("profile.name must not be empty".to_string()));
        }
        if self.assistant.greeting.trim().is_empty() {
            return Err(AppError::Content(
                "assistant.greeting must not be empty".to_string(),
            ));
        }
        if self.assistant.offline_message.trim().is_empty() {
            return Err(AppError::Content(
                "assistant.offline_message must not be empty".to_string(),
            ));
        }
        if let Some(p) = self.projects.iter().find(|p| p.title.trim().is_empty()) {
            return Err(AppError::Content(format!(
                "project with description {:?} has an empty title",
                p.description.chars().take(40).collect::<String>()
            )));
        }
        Ok(())
    }
}
