//! In-memory implementations of every store, for tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use coffeechat_core::directory::{BoxFuture, OrganizationLookup, ProfileLookup};
use coffeechat_core::error::LookupError;
use coffeechat_core::keys;
use coffeechat_core::models::chat_session::{ChatSession, ChatSessionRecord};
use coffeechat_core::models::essay::{Essay, EssayPatch};
use coffeechat_core::models::message::Message;
use coffeechat_core::models::organization::{name_matches, Organization};
use coffeechat_core::models::profile::UserProfile;

use crate::directory::rank_matches;
use crate::error::StorageError;
use crate::essays::EssayStore;
use crate::sessions::{next_record, ChatSessionStore};

#[derive(Default)]
struct Tables {
    sessions: HashMap<(Uuid, Uuid), ChatSessionRecord>,
    essays: HashMap<Uuid, Essay>,
    profiles: HashMap<Uuid, UserProfile>,
    organizations: Vec<Organization>,
}

/// Cheap to clone; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_essay(&self, essay: Essay) {
        self.tables.lock().await.essays.insert(essay.id, essay);
    }

    pub async fn insert_profile(&self, profile: UserProfile) {
        self.tables
            .lock()
            .await
            .profiles
            .insert(profile.user_id, profile);
    }

    pub async fn insert_organization(&self, organization: Organization) {
        self.tables.lock().await.organizations.push(organization);
    }
}

impl ChatSessionStore for MemoryStore {
    fn load(
        &self,
        user_id: Uuid,
        application_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<ChatSession>, StorageError>> {
        Box::pin(async move {
            let tables = self.tables.lock().await;
            Ok(tables
                .sessions
                .get(&(user_id, application_id))
                .cloned()
                .map(ChatSession::from))
        })
    }

    fn save<'a>(
        &'a self,
        user_id: Uuid,
        application_id: Uuid,
        session_id: Option<Uuid>,
        messages: &'a [Message],
    ) -> BoxFuture<'a, Result<Uuid, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let slot = (user_id, application_id);
            let record = next_record(
                tables.sessions.get(&slot),
                user_id,
                application_id,
                session_id,
                messages,
            );
            let id = record.id;
            tables.sessions.insert(slot, record);
            Ok(id)
        })
    }
}

impl EssayStore for MemoryStore {
    fn essay(&self, user_id: Uuid, id: Uuid) -> BoxFuture<'_, Result<Essay, StorageError>> {
        Box::pin(async move {
            self.tables
                .lock()
                .await
                .essays
                .get(&id)
                .filter(|essay| essay.user_id == user_id)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    key: keys::essay(user_id, id),
                })
        })
    }

    fn update_essay<'a>(
        &'a self,
        user_id: Uuid,
        id: Uuid,
        patch: &'a EssayPatch,
    ) -> BoxFuture<'a, Result<Essay, StorageError>> {
        Box::pin(async move {
            let mut tables = self.tables.lock().await;
            let essay = tables
                .essays
                .get_mut(&id)
                .filter(|essay| essay.user_id == user_id)
                .ok_or_else(|| StorageError::NotFound {
                    key: keys::essay(user_id, id),
                })?;
            essay.apply(patch);
            Ok(essay.clone())
        })
    }
}

impl ProfileLookup for MemoryStore {
    fn profile(&self, user_id: Uuid) -> BoxFuture<'_, Result<Option<UserProfile>, LookupError>> {
        Box::pin(async move { Ok(self.tables.lock().await.profiles.get(&user_id).cloned()) })
    }
}

impl OrganizationLookup for MemoryStore {
    fn search_organizations<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Organization>, LookupError>> {
        Box::pin(async move {
            let hits = self
                .tables
                .lock()
                .await
                .organizations
                .iter()
                .filter(|org| name_matches(&org.name, query))
                .cloned()
                .collect();
            Ok(rank_matches(query, hits))
        })
    }
}
