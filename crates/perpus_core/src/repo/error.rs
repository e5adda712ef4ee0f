//! Repository error taxonomy.
//!
//! # Invariants
//! - SQLite constraint failures surface as `ConstraintViolation`.
//! - Connectivity, locking and I/O failures surface as `StoreUnavailable`.
//! - Errors are never retried or swallowed inside the repository layer.

use crate::db::DbError;
use crate::model::EntityId;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure returned by every facade operation.
#[derive(Debug)]
pub enum RepoError {
    /// No record with `id` exists for `entity`.
    NotFound { entity: &'static str, id: EntityId },
    /// The store rejected a write because of a schema constraint.
    ConstraintViolation(DbError),
    /// The store could not be reached, was locked, or refused I/O.
    StoreUnavailable(DbError),
    /// Any other store failure, including bootstrap errors.
    Db(DbError),
    /// A persisted row could not be decoded.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::ConstraintViolation(err) => write!(f, "constraint violation: {err}"),
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "store is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "store table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConstraintViolation(err) | Self::StoreUnavailable(err) | Self::Db(err) => {
                Some(err)
            }
            Self::NotFound { .. }
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value.sqlite_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(value),
            Some(code) if is_unavailable(code) => Self::StoreUnavailable(value),
            _ => Self::Db(value),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        DbError::Sqlite(value).into()
    }
}

fn is_unavailable(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::CannotOpen
            | ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::SystemIoFailure
            | ErrorCode::DiskFull
            | ErrorCode::ReadOnly
            | ErrorCode::PermissionDenied
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::NotADatabase
    )
}
