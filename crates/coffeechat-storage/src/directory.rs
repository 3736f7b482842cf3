//! Profile and organization lookups backed by the bucket.

use tracing::{info, warn};
use uuid::Uuid;

use coffeechat_core::directory::{BoxFuture, OrganizationLookup, ProfileLookup};
use coffeechat_core::error::LookupError;
use coffeechat_core::keys;
use coffeechat_core::models::organization::{name_matches, Organization, OrganizationIndex};
use coffeechat_core::models::profile::UserProfile;

use crate::error::StorageError;
use crate::{objects, state, S3Store};

impl From<StorageError> for LookupError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Serialization(e) => LookupError::Malformed(e.to_string()),
            other => LookupError::Unavailable(other.to_string()),
        }
    }
}

/// Order search hits so an exact (case-insensitive) name match comes first,
/// then alphabetically.
pub fn rank_matches(query: &str, mut hits: Vec<Organization>) -> Vec<Organization> {
    let query = query.trim().to_lowercase();
    hits.sort_by(|a, b| {
        let a_exact = a.name.to_lowercase() == query;
        let b_exact = b.name.to_lowercase() == query;
        b_exact.cmp(&a_exact).then_with(|| a.name.cmp(&b.name))
    });
    hits
}

impl ProfileLookup for S3Store {
    fn profile(&self, user_id: Uuid) -> BoxFuture<'_, Result<Option<UserProfile>, LookupError>> {
        Box::pin(async move {
            let profile =
                state::load_json_opt(&self.s3, &self.bucket, &keys::profile(user_id)).await?;
            Ok(profile)
        })
    }
}

impl S3Store {
    async fn organization_by_id(&self, id: Uuid) -> Option<Organization> {
        let key = keys::organization(id);
        match state::load_json_opt(&self.s3, &self.bucket, &key).await {
            Ok(Some(org)) => Some(org),
            Ok(None) => {
                warn!(key = %key, "organization index entry has no record");
                None
            }
            Err(e) => {
                warn!(key = %key, error = %e, "skipping unreadable organization");
                None
            }
        }
    }

    /// Read every organization record and rewrite the name index from them.
    /// A failed index write is logged; the records are still returned.
    pub async fn rebuild_organization_index(&self) -> Result<Vec<Organization>, StorageError> {
        let keys =
            objects::list_objects(&self.s3, &self.bucket, keys::ORGANIZATIONS_PREFIX).await?;

        let mut organizations = Vec::with_capacity(keys.len());
        for key in &keys {
            match state::load_json(&self.s3, &self.bucket, key).await {
                Ok(org) => organizations.push(org),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable organization"),
            }
        }

        let index = OrganizationIndex::from_organizations(&organizations);
        if let Err(e) =
            state::save_json(&self.s3, &self.bucket, keys::ORGANIZATION_INDEX, &index).await
        {
            warn!(error = %e, "could not write organization index");
        } else {
            info!(count = index.entries.len(), "organization index rebuilt");
        }
        Ok(organizations)
    }
}

impl OrganizationLookup for S3Store {
    /// Matches come from the name index. A missing index, or one with no
    /// usable match, falls back to a full scan that also rewrites it.
    fn search_organizations<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Organization>, LookupError>> {
        Box::pin(async move {
            let index: Option<OrganizationIndex> =
                state::load_json_opt(&self.s3, &self.bucket, keys::ORGANIZATION_INDEX).await?;

            if let Some(index) = index {
                let mut hits = Vec::new();
                for id in index.matching_ids(query) {
                    if let Some(org) = self.organization_by_id(id).await {
                        hits.push(org);
                    }
                }
                if !hits.is_empty() {
                    return Ok(rank_matches(query, hits));
                }
            }

            let hits = self
                .rebuild_organization_index()
                .await?
                .into_iter()
                .filter(|org| name_matches(&org.name, query))
                .collect();
            Ok(rank_matches(query, hits))
        })
    }
}
