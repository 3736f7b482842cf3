use tracing::info;
use uuid::Uuid;

use coffeechat_core::directory::BoxFuture;
use coffeechat_core::keys;
use coffeechat_core::models::essay::{Essay, EssayPatch};

use crate::error::StorageError;
use crate::state;
use crate::S3Store;

/// Durable essay storage, scoped by owner. An essay belonging to another
/// user is reported as not found.
pub trait EssayStore: Send + Sync {
    fn essay(&self, user_id: Uuid, id: Uuid) -> BoxFuture<'_, Result<Essay, StorageError>>;

    /// Apply `patch` and return the stored essay.
    fn update_essay<'a>(
        &'a self,
        user_id: Uuid,
        id: Uuid,
        patch: &'a EssayPatch,
    ) -> BoxFuture<'a, Result<Essay, StorageError>>;
}

impl EssayStore for S3Store {
    fn essay(&self, user_id: Uuid, id: Uuid) -> BoxFuture<'_, Result<Essay, StorageError>> {
        Box::pin(async move {
            state::load_json(&self.s3, &self.bucket, &keys::essay(user_id, id)).await
        })
    }

    fn update_essay<'a>(
        &'a self,
        user_id: Uuid,
        id: Uuid,
        patch: &'a EssayPatch,
    ) -> BoxFuture<'a, Result<Essay, StorageError>> {
        Box::pin(async move {
            let key = keys::essay(user_id, id);
            let mut essay: Essay = state::load_json(&self.s3, &self.bucket, &key).await?;
            if !essay.apply(patch) {
                return Ok(essay);
            }
            state::save_json(&self.s3, &self.bucket, &key, &essay).await?;

            info!(%user_id, essay_id = %id, words = essay.word_count(), "essay updated");
            Ok(essay)
        })
    }
}
