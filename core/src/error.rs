use thiserror::Error;

use crate::Cell;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid cell key {0:?}")]
    InvalidCellKey(String),
    #[error("No cache at cell {0}")]
    NoCacheAt(Cell),
    #[error("Corrupt memento for cell {cell}: {reason}")]
    CorruptMemento { cell: Cell, reason: String },
    #[error("Malformed session record: {0}")]
    MalformedSnapshot(String),
    #[error("Unsupported session record version {0}")]
    UnsupportedVersion(u32),
    #[error("Could not encode state: {0}")]
    Encode(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
