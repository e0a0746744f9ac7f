use serde::{Deserialize, Serialize};

use crate::content::ContentStore;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub entry_count: usize,
    /// Entries that will render a disabled placeholder instead of their primary action.
    pub placeholder_count: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Experience,
    Project,
    Skill,
    Education,
    Links,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Section::Experience => "experience",
            Section::Project => "project",
            Section::Skill => "skill",
            Section::Education => "education",
            Section::Links => "links",
        }
    }
}

const SECTION_WEIGHTS: &[(Section, f64)] = &[
    (Section::Experience, 0.30),
    (Section::Project, 0.30),
    (Section::Skill, 0.15),
    (Section::Education, 0.10),
    (Section::Links, 0.15),
];

/// Per-entry quality in [0, 1] plus whether the entry renders a placeholder.
fn entry_scores(store: &ContentStore, section: Section) -> Vec<(f64, bool)> {
    match section {
        Section::Experience => store
            .experiences
            .iter()
            .map(|e| {
                let points = (e.points.len() as f64 / 3.0).min(1.0);
                let has_letter = e.offer_letter.is_some();
                (0.8 * points + if has_letter { 0.2 } else { 0.0 }, !has_letter)
            })
            .collect(),
        Section::Project => store
            .projects
            .iter()
            .map(|p| {
                let mut score = 0.4;
                if p.link.is_some() {
                    score += 0.3;
                }
                if p.image_url.is_some() {
                    score += 0.2;
                }
                if !p.technologies.is_empty() {
                    score += 0.1;
                }
                (score, p.link.is_none())
            })
            .collect(),
        Section::Skill => store
            .skills
            .iter()
            .map(|c| ((c.skills.len() as f64 / 4.0).min(1.0), false))
            .collect(),
        Section::Education => store
            .educations
            .iter()
            .map(|e| (if e.grade.is_some() { 1.0 } else { 0.7 }, false))
            .collect(),
        Section::Links => {
            let links = &store.profile.links;
            [
                &links.github,
                &links.linkedin,
                &links.instagram,
                &links.portfolio,
                &links.resume,
            ]
            .iter()
            .filter(|l| l.is_some())
            .map(|_| (1.0, false))
            .chain(links.resume.is_none().then_some((0.0, true)))
            .collect()
        }
    }
}

/// Summarises how fully the content store fills each rendered section.
/// Advisory only: nothing refuses to render on a low score.
pub fn compute_completeness_report(store: &ContentStore) -> CompletenessReport {
    let mut section_healths = Vec::new();
    let mut weighted_score_sum = 0.0;
    let mut missing_sections = Vec::new();

    for &(section, weight) in SECTION_WEIGHTS {
        let section_key = section.key();
        let scores = entry_scores(store, section);
        let entry_count = scores.iter().filter(|(s, _)| *s > 0.0).count();

        if entry_count == 0 {
            missing_sections.push(section_key.to_string());
            section_healths.push(SectionHealth {
                section: section_key.to_string(),
                score: 0.0,
                entry_count: 0,
                placeholder_count: 0,
                status: SectionStatus::Missing,
                recommendations: vec![format!(
                    "Add at least one {} entry so the section is not empty",
                    section_key
                )],
            });
            continue;
        }

        let placeholder_count = scores.iter().filter(|(_, p)| *p).count();
        let section_score =
            (scores.iter().map(|(s, _)| s).sum::<f64>() / scores.len() as f64).clamp(0.0, 1.0);

        let status = match section_score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s >= 0.2 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };

        let mut recommendations = Vec::new();
        if placeholder_count > 0 {
            recommendations.push(format!(
                "{} {} entries render a disabled placeholder; add the missing link",
                placeholder_count, section_key
            ));
        }
        if entry_count < 2 && matches!(section, Section::Experience | Section::Project) {
            recommendations.push(format!(
                "Add more {} entries to give the assistant more to draw on",
                section_key
            ));
        }

        weighted_score_sum += section_score * weight;
        section_healths.push(SectionHealth {
            section: section_key.to_string(),
            score: section_score,
            entry_count,
            placeholder_count,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessReport {
        overall_score,
        sections: section_healths,
        missing_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section<'a>(report: &'a CompletenessReport, name: &str) -> &'a SectionHealth {
        report.sections.iter().find(|s| s.section == name).unwrap()
    }

    #[test]
    fn test_builtin_content_has_no_missing_sections() {
        let store = ContentStore::builtin().unwrap();
        let report = compute_completeness_report(&store);
        assert!(report.missing_sections.is_empty());
        assert!(report.overall_score > 0.5);
    }

    #[test]
    fn test_missing_offer_letters_are_counted_as_placeholders() {
        let store = ContentStore::builtin().unwrap();
        let report = compute_completeness_report(&store);
        // Only the first experience carries an offer letter.
        assert_eq!(section(&report, "experience").placeholder_count, 3);
    }

    #[test]
    fn test_empty_projects_section_is_missing() {
        let mut store = ContentStore::builtin().unwrap();
        store.projects.clear();
        let report = compute_completeness_report(&store);
        assert!(report.missing_sections.contains(&"project".to_string()));
        assert_eq!(section(&report, "project").status, SectionStatus::Missing);
    }

    #[test]
    fn test_missing_resume_link_is_flagged() {
        let mut store = ContentStore::builtin().unwrap();
        store.profile.links.resume = None;
        let report = compute_completeness_report(&store);
        assert_eq!(section(&report, "links").placeholder_count, 1);
    }

    #[test]
    fn test_every_section_is_reported_once() {
        let report = compute_completeness_report(&ContentStore::builtin().unwrap());
        let names: Vec<&str> = report.sections.iter().map(|s| s.section.as_str()).collect();
        assert_eq!(names, vec!["experience", "project", "skill", "education", "links"]);
        assert!(report.sections.iter().all(|s| s.score > 0.0));
    }
}
