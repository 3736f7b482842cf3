use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "OrgType::default_type")]
    pub org_type: OrgType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub application_requirements: Option<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OrgType {
    Fraternity,
    Sorority,
    Club,
    HonorSociety,
    Professional,
    Academic,
    Service,
    Recreational,
    Religious,
    Cultural,
    Other,
}

impl OrgType {
    fn default_type() -> Self {
        Self::Club
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fraternity => "fraternity",
            Self::Sorority => "sorority",
            Self::Club => "club",
            Self::HonorSociety => "honor_society",
            Self::Professional => "professional",
            Self::Academic => "academic",
            Self::Service => "service",
            Self::Recreational => "recreational",
            Self::Religious => "religious",
            Self::Cultural => "cultural",
            Self::Other => "other",
        }
    }
}

/// Case-insensitive fuzzy match between an organization name and a search
/// string (typically an application title). Either may contain the other.
pub fn name_matches(name: &str, query: &str) -> bool {
    let name = name.trim().to_lowercase();
    let query = query.trim().to_lowercase();
    if name.is_empty() || query.is_empty() {
        return false;
    }
    name.contains(&query) || query.contains(&name)
}

/// Names and ids of every stored organization, kept in one object so a
/// search reads one index instead of every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationIndex {
    pub entries: Vec<OrganizationIndexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationIndexEntry {
    pub id: Uuid,
    pub name: String,
}

impl OrganizationIndex {
    pub fn from_organizations(organizations: &[Organization]) -> Self {
        Self {
            entries: organizations
                .iter()
                .map(|org| OrganizationIndexEntry {
                    id: org.id,
                    name: org.name.clone(),
                })
                .collect(),
        }
    }

    /// Ids whose name fuzzy-matches `query`, in index order.
    pub fn matching_ids(&self, query: &str) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter(|entry| name_matches(&entry.name, query))
            .map(|entry| entry.id)
            .collect()
    }
}
