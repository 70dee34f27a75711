//! Repository module
//!
//! CRUD and query operations over the embedded SurrealDB tables. Ids are
//! handled as `surrealdb::RecordId` end to end, with the "table:id" string
//! form at API boundaries.

pub mod customer;
pub mod driver;
pub mod offering;
pub mod order;
pub mod product;
pub mod store;
pub mod user;

pub use customer::CustomerRepository;
pub use driver::DriverRepository;
pub use offering::OfferingRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use store::StoreRepository;
pub use user::UserRepository;

use shared::{AppError, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as "already contains" query errors
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Parse an id that may arrive as "table:id" or as the bare key
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if let Some((prefix, key)) = id.split_once(':') {
        if prefix != table {
            return Err(RepoError::Validation(format!(
                "expected {} id, got {}",
                table, id
            )));
        }
        // Strip surrounding ⟨⟩ if the caller passed an escaped key
        let key = key.trim_matches(|c| c == '\u{27E8}' || c == '\u{27E9}');
        Ok(RecordId::from_table_key(table, key))
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_accepts_both_forms() {
        let a = parse_record_id("store", "store:abc").unwrap();
        let b = parse_record_id("store", "abc").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_record_id_rejects_wrong_table() {
        assert!(parse_record_id("store", "product:abc").is_err());
    }
}
