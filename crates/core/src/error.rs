//! Error types for Seatplan Core

use thiserror::Error;

use crate::models::TableId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Duplicate name: {0} is already on the roster or seated")]
    DuplicateName(String),

    #[error("Table {table_id} has {available} free chairs, {requested} requested")]
    Capacity {
        table_id: TableId,
        requested: usize,
        available: usize,
    },

    #[error("Conflict: {name} is already seated at table {table_id}")]
    Conflict { name: String, table_id: TableId },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for rejections of a seating mutation (the store is untouched
    /// and the caller only needs to show a notice).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::DuplicateName(_)
                | Error::Capacity { .. }
                | Error::Conflict { .. }
                | Error::NotFound(_)
                | Error::InvalidOperation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
