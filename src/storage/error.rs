use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid hit record: {0}")]
    InvalidRecord(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
