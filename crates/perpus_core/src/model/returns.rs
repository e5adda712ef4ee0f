//! Book return record.
//!
//! # Invariants
//! - `member_id` and `book_id` are plain numeric references; the store does
//!   not check that the referenced member or book exists.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// One book handed back by one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Return {
    /// Store-assigned identity; `None` until first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Identity of the returning member.
    pub member_id: EntityId,
    /// Identity of the returned book.
    pub book_id: EntityId,
}

impl Return {
    /// Creates an unsaved return record.
    pub fn new(member_id: EntityId, book_id: EntityId) -> Self {
        Self {
            id: None,
            member_id,
            book_id,
        }
    }

    /// Creates a return record bound to an existing identity.
    pub fn with_id(id: EntityId, member_id: EntityId, book_id: EntityId) -> Self {
        Self {
            id: Some(id),
            member_id,
            book_id,
        }
    }
}
