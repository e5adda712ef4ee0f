//! Library member record.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// A registered library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Store-assigned identity; `None` until first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Display name. The store rejects blank names.
    pub name: String,
}

impl Member {
    /// Creates an unsaved member.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Creates a member bound to an existing identity.
    ///
    /// Saving it overwrites the stored record with that identity.
    pub fn with_id(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }
}
