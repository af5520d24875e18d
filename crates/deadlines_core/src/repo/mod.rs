//! Durable storage seams for the deadline collection.
//!
//! # Responsibility
//! - Define the key-value contract the store persists through.
//! - Encode and decode the whole collection as one blob under one key.
//!
//! # Invariants
//! - Writes replace the full collection; there are no partial updates.
//! - Read paths fail only when the blob as a whole is unreadable.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod deadline_repo;
pub mod kv_store;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for key-value access and collection decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "deadline blob serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted deadline data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
