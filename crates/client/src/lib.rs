//! `invtrack-client`
//!
//! **Responsibility:** client-side store for the inventory tracker.
//!
//! This crate provides:
//! - An in-memory cache of the remote inventory collection
//! - CRUD operations that only touch the cache after the server confirms
//! - The draft and edit-buffer workflow used by front-ends
//!
//! The remote HTTP API is the authority; this crate is a thin shell around it.

pub mod config;
pub mod http;
pub mod remote;
pub mod store;
pub mod view;

pub use config::ClientConfig;
pub use http::HttpRemoteStore;
pub use remote::{RemoteError, RemoteStore};
pub use store::{EditState, InventoryStore};
