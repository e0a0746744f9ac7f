// System instruction for the portfolio assistant.
// Built once per process from the content store; the same content always
// produces byte-identical output.

use crate::content::ContentStore;

/// Opening paragraph. Replace `{name}` and `{first}` before use.
const PREAMBLE_TEMPLATE: &str = "You are a helpful AI assistant for {name}'s portfolio. \
Your goal is to answer questions about {first}'s professional background, skills, and projects \
based on the following information. Keep your answers professional, concise, and enthusiastic. \
Use markdown for formatting (e.g., **bold** and lists starting with \"* \").";

/// Closing paragraph. Replace `{first}` and `{persona}` before use.
const SCOPE_TEMPLATE: &str = "If a user asks something outside of {first}'s professional scope, \
you can briefly and positively mention their hobbies if relevant (e.g., if asked what they do for fun), \
but your primary goal is to redirect them back to the professional portfolio content. \
Use {first}'s tone: {persona}";

pub fn build_system_instruction(content: &ContentStore) -> String {
    let profile = &content.profile;
    let first = profile.first_name();

    let skills = content
        .skills
        .iter()
        .map(|cat| format!("* {}: {}", cat.name, cat.skills.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    let experience = content
        .experiences
        .iter()
        .map(|exp| {
            format!(
                "* {} at {} ({}): {}",
                exp.role,
                exp.company,
                exp.period,
                exp.points.join(". ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let projects = content
        .projects
        .iter()
        .map(|p| format!("* {}: {}", p.title, p.description))
        .collect::<Vec<_>>()
        .join("\n");

    let education = content
        .educations
        .iter()
        .map(|edu| format!("* {} from {}", edu.degree, edu.school))
        .collect::<Vec<_>>()
        .join("\n");

    let preamble = PREAMBLE_TEMPLATE
        .replace("{name}", &profile.name)
        .replace("{first}", first);
    let scope = SCOPE_TEMPLATE
        .replace("{first}", first)
        .replace("{persona}", &content.assistant.persona);

    format!(
        "{preamble}\n\n\
         Name: {name}\n\
         Role: {title}\n\
         Summary: {summary}\n\
         Skills: {skills}\n\
         Experience: {experience}\n\
         Projects: {projects}\n\
         Education: {education}\n\
         Hobbies: {hobbies}.\n\n\
         {scope}",
        name = profile.name,
        title = profile.title,
        summary = profile.summary,
        hobbies = profile.hobbies.join(". "),
    )
}
