//! Storage backend traits.
//!
//! The event store composes two backends:
//! - `RemoteBackend`: shared blob storage that assigns its own identifiers
//! - `LocalBackend`: device-local key-value storage keyed by identifiers the
//!   store mints itself

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::event::Event;

/// Result alias for backend operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Remote blob storage holding one document per event.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Store a new event and return the identifier the backend assigned.
    async fn create(&self, event: &Event) -> StoreResult<String>;

    /// Fetch an event. Missing documents are `StoreError::NotFound`.
    async fn fetch(&self, id: &str) -> StoreResult<Event>;

    /// Replace an existing event wholesale.
    async fn replace(&self, id: &str, event: &Event) -> StoreResult<()>;
}

/// Device-local storage, one entry per event.
#[async_trait]
pub trait LocalBackend: Send + Sync {
    /// Read an entry, `None` if absent.
    async fn read(&self, key: &str) -> StoreResult<Option<Event>>;

    /// Write (insert or overwrite) an entry.
    async fn write(&self, key: &str, event: &Event) -> StoreResult<()>;
}
