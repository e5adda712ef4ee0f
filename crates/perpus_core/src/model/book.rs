//! Catalogued book record.

use super::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// The store rejects blank titles.
    pub title: String,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }

    pub fn with_id(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
        }
    }
}
