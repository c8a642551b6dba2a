//! The remote store seam: the authoritative collection behind the cache.

use std::sync::Arc;

use async_trait::async_trait;

use invtrack_core::ItemId;
use invtrack_inventory::{InventoryItem, ItemPatch};

/// Failure talking to the remote store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Transport failure (unreachable host, DNS, connection reset).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    /// The response body was not the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
    /// The configured API URL cannot carry a path.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
}

/// CRUD access to the authoritative inventory collection.
///
/// Implementations return the server's representation of every record they
/// touch; callers must not substitute the payload they sent.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `GET /inventory`
    async fn list(&self) -> Result<Vec<InventoryItem>, RemoteError>;

    /// `POST /inventory`
    async fn create(&self, item: &InventoryItem) -> Result<InventoryItem, RemoteError>;

    /// `PUT /inventory/{id}`
    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<InventoryItem, RemoteError>;

    /// `DELETE /inventory/{id}`
    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T> RemoteStore for Arc<T>
where
    T: RemoteStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        (**self).list().await
    }

    async fn create(&self, item: &InventoryItem) -> Result<InventoryItem, RemoteError> {
        (**self).create(item).await
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<InventoryItem, RemoteError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        (**self).delete(id).await
    }
}
