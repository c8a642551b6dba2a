//! `RemoteStore` over the inventory REST API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use invtrack_core::ItemId;
use invtrack_inventory::{InventoryItem, ItemPatch};

use crate::config::ClientConfig;
use crate::remote::{RemoteError, RemoteStore};

/// HTTP client for the inventory API.
///
/// One request per call: no retries, no client-side timeout.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl HttpRemoteStore {
    pub fn new(api_url: String) -> Self {
        Self::from_config(&ClientConfig::new(api_url))
    }

    pub fn with_token(api_url: String, token: String) -> Self {
        Self::from_config(&ClientConfig::with_token(api_url, token))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            token: config.auth_token.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn collection_url(&self) -> Result<Url, RemoteError> {
        self.url_with(&["inventory"])
    }

    /// The id is pushed as a single path segment, so `/`, `#` and `?` in it
    /// are percent-encoded.
    fn item_url(&self, id: &ItemId) -> Result<Url, RemoteError> {
        self.url_with(&["inventory", id.as_str()])
    }

    fn url_with(&self, segments: &[&str]) -> Result<Url, RemoteError> {
        let mut url =
            Url::parse(&self.api_url).map_err(|e| RemoteError::InvalidUrl(format!("{}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.client.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, RemoteError> {
        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(RemoteError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        Ok(resp)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RemoteError> {
        let resp = self.send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, RemoteError> {
        let url = self.collection_url()?;
        tracing::debug!("GET {url}");
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn create(&self, item: &InventoryItem) -> Result<InventoryItem, RemoteError> {
        let url = self.collection_url()?;
        tracing::debug!("POST {url} (client id {})", item.id);
        self.send_json(self.request(Method::POST, url).json(item)).await
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<InventoryItem, RemoteError> {
        let url = self.item_url(id)?;
        tracing::debug!("PUT {url}");
        self.send_json(self.request(Method::PUT, url).json(patch)).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), RemoteError> {
        let url = self.item_url(id)?;
        tracing::debug!("DELETE {url}");
        // Response body is ignored.
        self.send(self.request(Method::DELETE, url)).await.map(|_| ())
    }
}
