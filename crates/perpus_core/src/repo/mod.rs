//! Repository layer: the CRUD facades over the library store.
//!
//! # Responsibility
//! - Define the uniform facade contract shared by every entity type.
//! - Keep SQL details inside one generic SQLite implementation.
//!
//! # Invariants
//! - Facades hold no state beyond a borrowed store connection.
//! - Store errors are classified (`ConstraintViolation`, `StoreUnavailable`)
//!   and propagated unchanged.

pub mod entity;
pub mod error;
pub mod sqlite_repo;

use crate::model::book::Book;
use crate::model::member::Member;
use crate::model::returns::Return;

pub use entity::Entity;
pub use error::{RepoError, RepoResult};
pub use sqlite_repo::{Repository, SqliteRepository};

pub type MemberRepository<'conn> = SqliteRepository<'conn, Member>;
pub type BookRepository<'conn> = SqliteRepository<'conn, Book>;
pub type ReturnRepository<'conn> = SqliteRepository<'conn, Return>;
