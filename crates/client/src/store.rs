//! In-memory inventory store mirrored from the remote API.
//!
//! The store owns three pieces of state:
//! - the cache of items as last confirmed by the server,
//! - the draft for an item not yet created,
//! - the edit state (at most one item being edited, with its buffer).
//!
//! The cache is only ever changed from a server response. Every failure is
//! logged and swallowed: the operation returns `false` and the store is left
//! as it was before the call.

use chrono::Utc;

use invtrack_core::entity::position_of;
use invtrack_core::ItemId;
use invtrack_inventory::{InventoryItem, ItemFields, ItemPatch};

use crate::remote::RemoteStore;

/// Which item, if any, is being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing { id: ItemId, buffer: ItemFields },
}

impl EditState {
    pub fn id(&self) -> Option<&ItemId> {
        match self {
            EditState::Idle => None,
            EditState::Editing { id, .. } => Some(id),
        }
    }

    pub fn is_editing(&self, target: &ItemId) -> bool {
        self.id() == Some(target)
    }
}

/// Client-side store for the inventory screen.
#[derive(Debug)]
pub struct InventoryStore<R> {
    remote: R,
    items: Vec<InventoryItem>,
    draft: ItemFields,
    edit: EditState,
}

impl<R: RemoteStore> InventoryStore<R> {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            items: Vec::new(),
            draft: ItemFields::default(),
            edit: EditState::Idle,
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&InventoryItem> {
        position_of(&self.items, id).map(|i| &self.items[i])
    }

    pub fn draft(&self) -> &ItemFields {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ItemFields {
        &mut self.draft
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// The edit buffer, while an item is being edited.
    pub fn edit_buffer_mut(&mut self) -> Option<&mut ItemFields> {
        match &mut self.edit {
            EditState::Idle => None,
            EditState::Editing { buffer, .. } => Some(buffer),
        }
    }

    /// Replace the cache with the server's full collection.
    ///
    /// On failure the cache is left empty.
    pub async fn load(&mut self) -> bool {
        match self.remote.list().await {
            Ok(items) => {
                warn_on_inconsistencies(&items);
                tracing::info!("loaded {} inventory items", items.len());
                self.items = items;
                true
            }
            Err(err) => {
                tracing::error!("Error fetching inventory items: {err}");
                self.items.clear();
                false
            }
        }
    }

    /// Submit the draft as a new item.
    ///
    /// The client assigns the id and both timestamps; the record appended to
    /// the cache is the one the server returns. The draft is reset only on
    /// success.
    pub async fn create(&mut self) -> bool {
        let candidate = match InventoryItem::from_draft(&self.draft, ItemId::new(), Utc::now()) {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!("not adding inventory item: {err}");
                return false;
            }
        };

        match self.remote.create(&candidate).await {
            Ok(created) => {
                if let Err(err) = created.check() {
                    tracing::warn!("server returned inconsistent item: {err}");
                }
                tracing::info!("added inventory item {}", created.id);
                self.items.push(created);
                self.draft.reset();
                true
            }
            Err(err) => {
                tracing::error!("Error adding inventory item: {err}");
                false
            }
        }
    }

    /// Submit new editable fields for a cached item.
    ///
    /// The fields are sent as given, an empty description included. On
    /// success the cached record is replaced by the server's representation
    /// and edit mode is closed.
    pub async fn update(&mut self, id: &ItemId, fields: ItemFields) -> bool {
        if position_of(&self.items, id).is_none() {
            tracing::warn!("not updating inventory item {id}: not in cache");
            return false;
        }

        let patch = ItemPatch::from_fields(&fields, Utc::now());
        let updated = match self.remote.update(id, &patch).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::error!("Error updating inventory item {id}: {err}");
                return false;
            }
        };

        match position_of(&self.items, id) {
            Some(pos) => self.items[pos] = updated,
            None => {
                tracing::warn!("inventory item {id} left the cache while updating");
                return false;
            }
        }
        if self.edit.is_editing(id) {
            self.edit = EditState::Idle;
        }
        tracing::info!("updated inventory item {id}");
        true
    }

    /// Commit the edit buffer of the item being edited.
    pub async fn save_edit(&mut self) -> bool {
        let (id, buffer) = match &self.edit {
            EditState::Idle => {
                tracing::warn!("no inventory item is being edited");
                return false;
            }
            EditState::Editing { id, buffer } => (id.clone(), buffer.clone()),
        };
        self.update(&id, buffer).await
    }

    /// Delete an item. The cache is only changed once the server confirms.
    ///
    /// Also closes edit mode if the deleted item was the one being edited.
    pub async fn delete(&mut self, id: &ItemId) -> bool {
        if let Err(err) = self.remote.delete(id).await {
            tracing::error!("Error deleting inventory item {id}: {err}");
            return false;
        }

        self.items.retain(|item| &item.id != id);
        if self.edit.is_editing(id) {
            self.edit = EditState::Idle;
        }
        tracing::info!("deleted inventory item {id}");
        true
    }

    /// Start editing a cached item, abandoning any other unsaved edit.
    pub fn begin_edit(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.get(id) else {
            tracing::warn!("cannot edit inventory item {id}: not in cache");
            return false;
        };

        let buffer = item.fields();
        if let Some(previous) = self.edit.id().filter(|prev| *prev != id) {
            tracing::debug!("abandoning unsaved edit of {previous}");
        }
        self.edit = EditState::Editing {
            id: id.clone(),
            buffer,
        };
        true
    }
}

fn warn_on_inconsistencies(items: &[InventoryItem]) {
    let mut seen = std::collections::HashSet::new();
    for item in items {
        if !seen.insert(&item.id) {
            tracing::warn!("server returned duplicate inventory id {}", item.id);
        }
        if let Err(err) = item.check() {
            tracing::warn!("server returned inconsistent item: {err}");
        }
    }
}
