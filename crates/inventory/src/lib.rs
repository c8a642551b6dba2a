//! Inventory domain module.
//!
//! Record shapes, enumerations and validation for tracked inventory items,
//! implemented as deterministic domain logic (no IO, no HTTP, no storage).

pub mod fields;
pub mod item;
pub mod timestamp;

pub use fields::ItemFields;
pub use item::{InventoryItem, ItemPatch, ItemState, ItemType};
