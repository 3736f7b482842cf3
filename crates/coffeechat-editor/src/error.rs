use thiserror::Error;

use coffeechat_core::error::CoreError;
use coffeechat_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is already being generated")]
    TurnInFlight,

    #[error("no turn is awaiting a reply")]
    NoTurnInFlight,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
