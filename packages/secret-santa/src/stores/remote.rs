//! Remote backend over the jsonblob REST protocol.

use async_trait::async_trait;
use jsonblob_client::{BlobError, JsonBlobClient};

use crate::error::StoreError;
use crate::traits::store::{RemoteBackend, StoreResult};
use crate::types::event::Event;

impl From<BlobError> for StoreError {
    fn from(err: BlobError) -> Self {
        match err {
            BlobError::NotFound { id } | BlobError::InvalidId(id) => StoreError::NotFound { id },
            other => StoreError::Unreachable(other.to_string()),
        }
    }
}

#[async_trait]
impl RemoteBackend for JsonBlobClient {
    async fn create(&self, event: &Event) -> StoreResult<String> {
        Ok(JsonBlobClient::create(self, event).await?)
    }

    async fn fetch(&self, id: &str) -> StoreResult<Event> {
        Ok(self.get(id).await?)
    }

    async fn replace(&self, id: &str, event: &Event) -> StoreResult<()> {
        Ok(self.update(id, event).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_not_found_maps_to_not_found() {
        let err: StoreError = BlobError::NotFound { id: "42".into() }.into();
        assert!(matches!(err, StoreError::NotFound { id } if id == "42"));
    }

    #[test]
    fn test_other_blob_errors_map_to_unreachable() {
        let err: StoreError = BlobError::Api {
            status: 503,
            message: "down".into(),
        }
        .into();
        assert!(err.is_retryable());

        let err: StoreError = BlobError::MissingLocation.into();
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_path_like_ids_stay_inside_the_blob_collection() {
        let client = JsonBlobClient::new().with_base_url("http://127.0.0.1:9");
        let err = RemoteBackend::fetch(&client, "..").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref id } if id == ".."));

        // Encoded as one segment, so the request goes out (and fails to connect).
        let err = RemoteBackend::fetch(&client, "../secret").await.unwrap_err();
        assert!(matches!(err, StoreError::Unreachable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_retryable() {
        let client = JsonBlobClient::new().with_base_url("http://127.0.0.1:9");
        let err = RemoteBackend::fetch(&client, "123").await.unwrap_err();
        assert!(err.is_retryable());
    }
}
