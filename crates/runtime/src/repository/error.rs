//! Failures while reading or writing save slots.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save slot store lock was poisoned")]
    LockPoisoned,

    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a snapshot failed; the slot is unreadable.
    #[error("save data is not a valid kit snapshot: {0}")]
    Serialization(String),

    #[error("invalid save slot name: {0:?}")]
    InvalidSlot(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
