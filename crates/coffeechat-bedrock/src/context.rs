//! Prompt context for a chat turn.
//!
//! The aggregator gathers the user's profile, the organization matching the
//! application title, and the essay being edited, and renders each as a
//! plain-text section. Lookups that fail or find nothing fall back to fixed
//! placeholders, so building context never fails.

use std::sync::Arc;

use tracing::{debug, warn};

use coffeechat_core::directory::{OrganizationLookup, ProfileLookup};
use coffeechat_core::models::context::{
    ContextBundle, ContextRequest, NO_ORGANIZATION, NO_PROFILE,
};
use coffeechat_core::models::organization::Organization;
use coffeechat_core::models::profile::UserProfile;

use crate::tools;

const NOT_AVAILABLE: &str = "N/A";
const NO_RESUME: &str = "No resume provided";
const NO_CONTENT: &str = "No content yet";

const PERSONA: &str =
    "You are Goose, a concise essay writing assistant. You can write or modify essays using tools.";

const RULES: &str = "\
Rules:
- NEVER make up or hallucinate information about organizations or users
- Only use information provided in the contexts above
- If you don't have specific info, say so honestly
- When asked about the organization for the first time, use index_organization tool
- When asked about user's background/profile, use read_profile tool to display it as a card
- When asked to write/improve essays, use the essay tools and reference the user's resume/profile
- Use the user's resume content to personalize essays and highlight relevant experiences
- Pick exactly the one tool that matches the request
- Otherwise, give brief advice (1-2 sentences max)";

#[derive(Clone)]
pub struct ContextAggregator {
    profiles: Arc<dyn ProfileLookup>,
    organizations: Arc<dyn OrganizationLookup>,
}

impl ContextAggregator {
    pub fn new(profiles: Arc<dyn ProfileLookup>, organizations: Arc<dyn OrganizationLookup>) -> Self {
        Self {
            profiles,
            organizations,
        }
    }

    pub async fn build(&self, request: &ContextRequest) -> ContextBundle {
        let profile = match request.user_id {
            Some(user_id) => match self.profiles.profile(user_id).await {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(%user_id, error = %e, "profile lookup failed");
                    None
                }
            },
            None => None,
        };

        let organization = match present(&request.application_title) {
            Some(title) => match self.organizations.search_organizations(title).await {
                Ok(hits) => hits.into_iter().next(),
                Err(e) => {
                    warn!(application_title = title, error = %e, "organization lookup failed");
                    None
                }
            },
            None => None,
        };

        debug!(
            has_profile = profile.is_some(),
            has_organization = organization.is_some(),
            "context built"
        );

        ContextBundle {
            profile: profile
                .as_ref()
                .map_or_else(|| NO_PROFILE.to_string(), render_profile),
            organization: organization
                .as_ref()
                .map_or_else(|| NO_ORGANIZATION.to_string(), render_organization),
            essay: render_essay(request),
            resume: profile
                .as_ref()
                .and_then(UserProfile::resume)
                .map(str::to_string),
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn or_na(field: Option<&str>) -> &str {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

pub fn render_profile(profile: &UserProfile) -> String {
    let name = profile.full_name();
    let year = profile.graduation_year.map(|y| y.to_string());
    format!(
        "- Name: {}\n- School: {}\n- Major: {}\n- Graduation Year: {}\n- Resume: {}",
        or_na(name.as_deref()),
        or_na(profile.school_name.as_deref()),
        or_na(profile.major.as_deref()),
        or_na(year.as_deref()),
        profile.resume().unwrap_or(NO_RESUME),
    )
}

pub fn render_organization(org: &Organization) -> String {
    format!(
        "- Name: {}\n- Type: {}\n- Description: {}\n- Application Requirements: {}\n\
         - Application Deadline: {}\n- Contact Email: {}\n- Website: {}",
        org.name,
        org.org_type.as_str(),
        or_na(org.description.as_deref()),
        or_na(org.application_requirements.as_deref()),
        or_na(org.application_deadline.as_deref()),
        or_na(org.contact_email.as_deref()),
        or_na(org.website_url.as_deref()),
    )
}

pub fn render_essay(request: &ContextRequest) -> String {
    let content = request
        .essay_content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(NO_CONTENT);

    let mut section = format!(
        "- Application: {}\n- Essay Title: {}\n- Essay Prompt: {}\n- Current Content: {}",
        or_na(request.application_title.as_deref()),
        or_na(request.essay_title.as_deref()),
        or_na(request.essay_prompt.as_deref()),
        content,
    );
    if let Some(selected) = present(&request.selected_text) {
        section.push_str(&format!("\n- Selected Text: \"{selected}\""));
    }
    section
}

/// The full system instruction: persona, context sections, the tool list,
/// then the behavioural rules.
pub fn system_prompt(context: &ContextBundle) -> String {
    let mut prompt = String::from(PERSONA);
    prompt.push_str("\n\n");

    for (tag, body) in [
        ("user_profile", &context.profile),
        ("organization", &context.organization),
        ("essay", &context.essay),
    ] {
        prompt.push_str(&format!("<{tag}>\n{body}\n</{tag}>\n\n"));
    }

    prompt.push_str("Available tools:\n");
    for tool in tools::catalog() {
        prompt.push_str(&format!("- {}: {}\n", tool.name, tool.description));
    }
    prompt.push('\n');
    prompt.push_str(RULES);
    prompt
}
