use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invtrack_core::{DomainError, DomainResult, Entity, ItemId};

use crate::fields::ItemFields;
use crate::timestamp;

/// Category of a tracked item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemType {
    #[default]
    #[serde(rename = "computer equipment")]
    ComputerEquipment,
    #[serde(rename = "furniture")]
    Furniture,
    #[serde(rename = "communication equipment")]
    CommunicationEquipment,
    #[serde(rename = "machinery")]
    Machinery,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::ComputerEquipment,
        ItemType::Furniture,
        ItemType::CommunicationEquipment,
        ItemType::Machinery,
    ];

    /// Wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::ComputerEquipment => "computer equipment",
            ItemType::Furniture => "furniture",
            ItemType::CommunicationEquipment => "communication equipment",
            ItemType::Machinery => "machinery",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::ComputerEquipment => "Computer Equipment",
            ItemType::Furniture => "Furniture",
            ItemType::CommunicationEquipment => "Communication Equipment",
            ItemType::Machinery => "Machinery",
        }
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| DomainError::unknown_variant("item type", s))
    }
}

/// Lifecycle status of a tracked item. None of these values marks a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemState {
    #[default]
    #[serde(rename = "in use")]
    InUse,
    #[serde(rename = "lost")]
    Lost,
    #[serde(rename = "deprecated")]
    Deprecated,
    #[serde(rename = "broken")]
    Broken,
}

impl ItemState {
    pub const ALL: [ItemState; 4] = [
        ItemState::InUse,
        ItemState::Lost,
        ItemState::Deprecated,
        ItemState::Broken,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::InUse => "in use",
            ItemState::Lost => "lost",
            ItemState::Deprecated => "deprecated",
            ItemState::Broken => "broken",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemState::InUse => "In Use",
            ItemState::Lost => "Lost",
            ItemState::Deprecated => "Deprecated",
            ItemState::Broken => "Broken",
        }
    }
}

impl core::fmt::Display for ItemState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ItemState::ALL
            .into_iter()
            .find(|st| st.as_str() == wanted)
            .ok_or_else(|| DomainError::unknown_variant("item state", s))
    }
}

/// Accept `In Use`, `in-use` and `in_use` as well as the wire form.
fn normalize(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Read model: one tracked item as the remote store represents it.
///
/// This is also the create payload: the client fills in `id` and both
/// timestamps before submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub description: String,
    pub state: ItemState,
    #[serde(with = "timestamp")]
    pub added_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub last_updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Build a not-yet-submitted record from validated draft fields.
    ///
    /// Both timestamps are set to `now`.
    pub fn from_draft(fields: &ItemFields, id: ItemId, now: DateTime<Utc>) -> DomainResult<Self> {
        fields.validate()?;
        Ok(Self {
            id,
            item_type: fields.item_type,
            description: fields.description.clone(),
            state: fields.state,
            added_at: now,
            last_updated_at: now,
        })
    }

    /// The editable part of this record.
    pub fn fields(&self) -> ItemFields {
        ItemFields {
            item_type: self.item_type,
            description: self.description.clone(),
            state: self.state,
        }
    }

    /// Check the record-level invariants.
    pub fn check(&self) -> DomainResult<()> {
        if self.added_at > self.last_updated_at {
            return Err(DomainError::validation(format!(
                "item {}: added_at {} is after last_updated_at {}",
                self.id,
                timestamp::to_wire(&self.added_at),
                timestamp::to_wire(&self.last_updated_at)
            )));
        }
        if self.description.is_empty() {
            return Err(DomainError::validation(format!("item {}: empty description", self.id)));
        }
        Ok(())
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Update payload: the editable fields plus a fresh `last_updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub description: String,
    pub state: ItemState,
    #[serde(with = "timestamp")]
    pub last_updated_at: DateTime<Utc>,
}

impl ItemPatch {
    pub fn from_fields(fields: &ItemFields, now: DateTime<Utc>) -> Self {
        Self {
            item_type: fields.item_type,
            description: fields.description.clone(),
            state: fields.state,
            last_updated_at: now,
        }
    }
}
