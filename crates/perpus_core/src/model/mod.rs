//! Library domain records.
//!
//! # Responsibility
//! - Define the member, book and return records handled by the facades.
//!
//! # Invariants
//! - Every record carries an optional store-assigned `EntityId`; `None`
//!   means the record has never been persisted.
//! - Identities are unique per entity type and never reused after deletion.

pub mod book;
pub mod member;
pub mod returns;

/// Numeric identity assigned by the store on first insert.
pub type EntityId = i64;
