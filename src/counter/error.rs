use thiserror::Error;

use crate::storage::StorageError;
use crate::timezone::TimezoneError;

#[derive(Debug, Error)]
pub enum QuotaError {
    /// The durable write failed; the hit was not counted and the cache was
    /// left untouched.
    #[error("failed to record hit for user {user_id}: {source}")]
    RecordFailure {
        user_id: String,
        #[source]
        source: StorageError,
    },
    #[error("user id cannot be empty")]
    EmptyUserId,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("timezone error: {0}")]
    Timezone(#[from] TimezoneError),
}
