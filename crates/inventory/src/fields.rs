//! Editable fields of an item: the shape of both the draft and the edit buffer.

use serde::{Deserialize, Serialize};

use invtrack_core::{DomainError, DomainResult, ValueObject};

use crate::item::{ItemState, ItemType};

/// `type`, `description` and `state` of an item, held locally until confirmed.
///
/// The default value is the blank add form: computer equipment, empty
/// description, in use.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemFields {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub description: String,
    pub state: ItemState,
}

impl ValueObject for ItemFields {}

impl ItemFields {
    pub fn new(item_type: ItemType, description: impl Into<String>, state: ItemState) -> Self {
        Self {
            item_type,
            description: description.into(),
            state,
        }
    }

    /// A record can only be created with a non-empty description.
    pub fn validate(&self) -> DomainResult<()> {
        if self.description.is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Restore the blank form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
