//! The fixed tool catalog offered to the model, and the typed form of each
//! tool call.
//!
//! Tool arguments arrive as loosely typed JSON. They are validated into a
//! [`ToolInvocation`] before anything else looks at them; a call that names
//! an unknown tool or does not match its schema fails the whole turn.

use serde::Deserialize;
use serde_json::{Value, json};

use coffeechat_core::models::context::ContextBundle;
use coffeechat_core::models::message::{
    Attachment, EditKind, OrganizationBrief, OrganizationLookup, PendingEdit, ProfileBrief,
    ResumeBrief,
};

use crate::error::BedrockError;

/// Bumped whenever a tool is added, removed, or changes shape.
pub const CATALOG_VERSION: u32 = 1;

pub const WRITE_CONFIRMATION: &str =
    "I've prepared a complete essay. Review and accept/reject the changes.";
pub const MODIFY_CONFIRMATION: &str =
    "I've prepared improvements to your essay. Review and accept/reject the changes.";
pub const ORGANIZATION_CONFIRMATION: &str =
    "I've analyzed this organization for you based on the available data.";
pub const PROFILE_CONFIRMATION: &str = "I have read the user's profile.";

/// Card title shown for a `read_profile` call, whatever summary the model
/// supplied.
pub const PROFILE_CARD_SUMMARY: &str = "Read User Profile";
pub const NO_RESUME_CONTENT: &str = "No resume content available";

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "object", "properties": properties, "required": required })
}

/// Every tool the model may call, in the order they are offered.
pub fn catalog() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "write_essay",
            description: "Write a complete essay from scratch based on the prompt",
            input_schema: object_schema(
                json!({ "content": string_property("The complete essay content") }),
                &["content"],
            ),
        },
        ToolDefinition {
            name: "modify_essay",
            description: "Improve or modify existing essay content",
            input_schema: object_schema(
                json!({ "content": string_property("The improved essay content") }),
                &["content"],
            ),
        },
        ToolDefinition {
            name: "index_organization",
            description: "Index and analyze organization data when first asked about it",
            input_schema: object_schema(
                json!({
                    "analysis": string_property(
                        "Analysis of the organization including culture, values, ideal candidates"
                    ),
                    "tips": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Specific tips for writing essays for this organization",
                    },
                }),
                &["analysis", "tips"],
            ),
        },
        ToolDefinition {
            name: "read_profile",
            description: "Display user profile information as a card when asked about their background",
            input_schema: object_schema(
                json!({
                    "summary": string_property("A brief summary of the user's profile and background")
                }),
                &[],
            ),
        },
        ToolDefinition {
            name: "fetch_resume",
            description: "Fetch and display the user's resume content to reference when writing essays",
            input_schema: object_schema(
                json!({ "action": string_property("Description of what the resume is being used for") }),
                &["action"],
            ),
        },
        ToolDefinition {
            name: "fetch_organization_info",
            description: "Fetch detailed information about the organization being applied to",
            input_schema: object_schema(
                json!({
                    "organization_name": string_property("Name of the organization to fetch information for"),
                    "purpose": string_property("Purpose of fetching the organization info"),
                }),
                &["organization_name", "purpose"],
            ),
        },
    ]
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "name", content = "input", rename_all = "snake_case")]
pub enum ToolInvocation {
    WriteEssay {
        content: String,
    },
    ModifyEssay {
        content: String,
    },
    IndexOrganization {
        analysis: String,
        tips: Vec<String>,
    },
    ReadProfile {
        #[serde(default)]
        summary: Option<String>,
    },
    FetchResume {
        action: String,
    },
    FetchOrganizationInfo {
        organization_name: String,
        purpose: String,
    },
}

impl ToolInvocation {
    /// Validate a raw tool call against the catalog.
    pub fn parse(name: &str, input: Value) -> Result<Self, BedrockError> {
        serde_json::from_value(json!({ "name": name, "input": input }))
            .map_err(|e| BedrockError::SchemaViolation(format!("tool {name}: {e}")))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WriteEssay { .. } => "write_essay",
            Self::ModifyEssay { .. } => "modify_essay",
            Self::IndexOrganization { .. } => "index_organization",
            Self::ReadProfile { .. } => "read_profile",
            Self::FetchResume { .. } => "fetch_resume",
            Self::FetchOrganizationInfo { .. } => "fetch_organization_info",
        }
    }

    /// The sentence appended to the reply text when this tool fires.
    pub fn confirmation(&self) -> String {
        match self {
            Self::WriteEssay { .. } => WRITE_CONFIRMATION.to_string(),
            Self::ModifyEssay { .. } => MODIFY_CONFIRMATION.to_string(),
            Self::IndexOrganization { .. } => ORGANIZATION_CONFIRMATION.to_string(),
            Self::ReadProfile { .. } => PROFILE_CONFIRMATION.to_string(),
            Self::FetchResume { action } => {
                format!("Fetching your resume to {}...", action.to_lowercase())
            }
            Self::FetchOrganizationInfo {
                organization_name, ..
            } => format!("Fetching {organization_name} information..."),
        }
    }

    /// The attachment this call produces. Resume and organization cards
    /// are filled from the turn's context, not from the model's arguments.
    pub fn into_attachment(self, context: &ContextBundle) -> Attachment {
        match self {
            Self::WriteEssay { content } => Attachment::PendingEdit(PendingEdit {
                edit_kind: EditKind::Write,
                proposed_content: content,
            }),
            Self::ModifyEssay { content } => Attachment::PendingEdit(PendingEdit {
                edit_kind: EditKind::Modify,
                proposed_content: content,
            }),
            Self::IndexOrganization { analysis, tips } => {
                Attachment::OrganizationBrief(OrganizationBrief { analysis, tips })
            }
            Self::ReadProfile { .. } => Attachment::ProfileBrief(ProfileBrief {
                summary: PROFILE_CARD_SUMMARY.to_string(),
            }),
            Self::FetchResume { action } => Attachment::ResumeBrief(ResumeBrief {
                purpose: action,
                excerpt: context
                    .resume
                    .clone()
                    .unwrap_or_else(|| NO_RESUME_CONTENT.to_string()),
            }),
            Self::FetchOrganizationInfo {
                organization_name,
                purpose,
            } => {
                let info = if context.has_organization() {
                    context.organization.clone()
                } else {
                    format!("Fetching information for {organization_name}...")
                };
                Attachment::OrganizationLookup(OrganizationLookup {
                    name: organization_name,
                    purpose,
                    info,
                })
            }
        }
    }
}
