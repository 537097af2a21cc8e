//! Pure JSON blob storage REST client.
//!
//! A minimal client for jsonblob-style services: anonymous, schemaless JSON
//! documents addressed by an id the service assigns on creation.
//!
//! - `POST <base>` stores a document; the new id is the last path segment of
//!   the `Location` response header.
//! - `GET <base>/<id>` returns the document.
//! - `PUT <base>/<id>` replaces the document.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonblob_client::JsonBlobClient;
//!
//! let client = JsonBlobClient::new();
//!
//! let id = client.create(&serde_json::json!({ "hello": "world" })).await?;
//! let doc: serde_json::Value = client.get(&id).await?;
//! client.update(&id, &serde_json::json!({ "hello": "again" })).await?;
//! ```

pub mod error;

pub use error::{BlobError, Result};

use reqwest::{header, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

/// Public jsonblob.com endpoint.
pub const DEFAULT_BASE_URL: &str = "https://jsonblob.com/api/jsonBlob";

#[derive(Debug, Clone)]
pub struct JsonBlobClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for JsonBlobClient {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBlobClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at another blob service (self-hosted, test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one blob. The id is percent-encoded as a single path segment,
    /// so it can never address another path on the host.
    fn blob_url(&self, id: &str) -> Result<Url> {
        if matches!(id, "" | "." | "..") {
            return Err(BlobError::InvalidId(id.to_string()));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BlobError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| BlobError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Store a new document and return the id the service assigned to it.
    pub async fn create<T: Serialize + ?Sized>(&self, body: &T) -> Result<String> {
        let resp = self
            .client
            .post(&self.base_url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlobError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let location = resp
            .headers()
            .get(header::LOCATION)
            .ok_or(BlobError::MissingLocation)?
            .to_str()
            .map_err(|e| BlobError::InvalidLocation(e.to_string()))?;

        let id = blob_id_from_location(location)?;
        debug!(blob_id = %id, "Created blob");
        Ok(id)
    }

    /// Fetch a document by id.
    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<T> {
        let resp = self
            .client
            .get(self.blob_url(id)?)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlobError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlobError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// Replace a document. The response body carries nothing useful.
    pub async fn update<T: Serialize + ?Sized>(&self, id: &str, body: &T) -> Result<()> {
        let resp = self
            .client
            .put(self.blob_url(id)?)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlobError::NotFound { id: id.to_string() });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlobError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!(blob_id = %id, "Updated blob");
        Ok(())
    }
}

/// Extract the blob id from a `Location` header value.
///
/// Accepts absolute URLs and bare paths; the id is the final path segment.
pub fn blob_id_from_location(location: &str) -> Result<String> {
    location
        .trim()
        .split('/')
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BlobError::InvalidLocation(location.to_string()))
}
