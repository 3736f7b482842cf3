//! Read-only collaborators consulted when building prompt context.
//!
//! Both lookups may legitimately find nothing; that is `Ok(None)` /
//! `Ok(vec![])`, not an error.

use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;

use crate::error::LookupError;
use crate::models::organization::Organization;
use crate::models::profile::UserProfile;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Profile lookup keyed by user id.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ProfileLookup: Send + Sync {
    fn profile(&self, user_id: Uuid) -> BoxFuture<'_, Result<Option<UserProfile>, LookupError>>;
}

/// Organization search by fuzzy name match.
pub trait OrganizationLookup: Send + Sync {
    /// Organizations whose name matches `query`, best candidate first.
    fn search_organizations<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Organization>, LookupError>>;
}
