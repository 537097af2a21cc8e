//! File-based local storage.
//!
//! One pretty-printed JSON file per event, named after its key. Good for:
//! - Command-line sessions that outlive a process
//! - Offline use with no remote backend

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::traits::store::{LocalBackend, StoreResult};
use crate::types::event::Event;

/// Local backend rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for a key, or `None` if the key could escape the directory.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl LocalBackend for FileStore {
    async fn read(&self, key: &str) -> StoreResult<Option<Event>> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, event: &Event) -> StoreResult<()> {
        let path = self.path_for(key).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid local event key: {key}"),
            )
        })?;

        fs::create_dir_all(&self.dir).await?;

        // Readers never observe a partially written record.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(event)?).await?;
        fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), "Wrote local event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::create_assignment;
    use crate::error::StoreError;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("events"));
        let event = create_assignment(&["Ann", "Bo", "Cy"]).unwrap();

        store.write("local_abc", &event).await.unwrap();
        assert!(dir.path().join("events/local_abc.json").exists());

        let loaded = store.read("local_abc").await.unwrap();
        assert_eq!(loaded, Some(event));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.read("local_missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_path_traversal_keys_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let event = create_assignment(&["Ann", "Bo", "Cy"]).unwrap();

        assert_eq!(store.read("../secrets").await.unwrap(), None);

        let err = store.write("local_/../x", &event).await.unwrap_err();
        assert!(matches!(err, StoreError::Local(_)));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("local_bad.json"), b"{oops").unwrap();
        let store = FileStore::new(dir.path());

        let err = store.read("local_bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
