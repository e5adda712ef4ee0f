//! Persistence core for the library store.
//!
//! Members, books and returns are each reached through one uniform CRUD
//! facade (`Repository`) backed by SQLite.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::book::Book;
pub use model::member::Member;
pub use model::returns::Return;
pub use model::EntityId;
pub use repo::{
    BookRepository, Entity, MemberRepository, RepoError, RepoResult, Repository,
    ReturnRepository, SqliteRepository,
};
pub use service::library::{Library, StoreSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
