//! Library facade bundle.
//!
//! # Invariants
//! - All facades share the one connection handed to `Library::try_new`.
//! - Construction fails if any entity table is missing or malformed.

use crate::repo::{BookRepository, MemberRepository, Repository, RepoResult, ReturnRepository};
use log::info;
use rusqlite::Connection;
use serde::Serialize;

/// Record counts per entity type at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub members: u64,
    pub books: u64,
    pub returns: u64,
}

/// The member, book and return facades over one store connection.
pub struct Library<'conn> {
    members: MemberRepository<'conn>,
    books: BookRepository<'conn>,
    returns: ReturnRepository<'conn>,
}

impl<'conn> Library<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let library = Self {
            members: MemberRepository::try_new(conn)?,
            books: BookRepository::try_new(conn)?,
            returns: ReturnRepository::try_new(conn)?,
        };
        info!("event=library_init module=service status=ok");
        Ok(library)
    }

    pub fn members(&self) -> &MemberRepository<'conn> {
        &self.members
    }

    pub fn books(&self) -> &BookRepository<'conn> {
        &self.books
    }

    pub fn returns(&self) -> &ReturnRepository<'conn> {
        &self.returns
    }

    /// Counts each entity type. Counts are read one after another, not as a
    /// single snapshot.
    pub fn summary(&self) -> RepoResult<StoreSummary> {
        Ok(StoreSummary {
            members: self.members.count()?,
            books: self.books.count()?,
            returns: self.returns.count()?,
        })
    }
}
