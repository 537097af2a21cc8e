//! Event persistence with a remote-primary, local-fallback strategy.
//!
//! `create` tries the remote backend and silently falls back to local storage
//! on any failure. `get` and `update` route by identifier namespace and never
//! fall back: once an event is remote it stays remote.

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::traits::store::{LocalBackend, RemoteBackend, StoreResult};
use crate::types::event::{Event, EventId, LOCAL_PREFIX};

/// Routes event reads and writes between a remote and a local backend.
pub struct EventStore<R, L> {
    remote: Option<R>,
    local: L,
}

impl<R: RemoteBackend, L: LocalBackend> EventStore<R, L> {
    pub fn new(remote: R, local: L) -> Self {
        Self {
            remote: Some(remote),
            local,
        }
    }

    /// A store with no remote backend: every event is created locally.
    pub fn local_only(local: L) -> Self {
        Self {
            remote: None,
            local,
        }
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    /// Persist a new event and return its identifier.
    ///
    /// Remote failures are logged and downgraded to a local identifier; this
    /// only fails if the local write fails too.
    pub async fn create(&self, event: &Event) -> StoreResult<EventId> {
        if let Some(remote) = &self.remote {
            match remote.create(event).await {
                Ok(id) if !id.is_empty() && !id.starts_with(LOCAL_PREFIX) => {
                    info!(event_id = %id, "Created event in remote storage");
                    return Ok(EventId::from(id));
                }
                Ok(id) => {
                    warn!(
                        remote_id = %id,
                        "Remote storage returned an unusable id, falling back to local storage"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Remote storage failed, falling back to local storage");
                }
            }
        }

        let id = EventId::new_local();
        self.local.write(id.as_str(), event).await?;
        info!(event_id = %id, "Created event in local storage");
        Ok(id)
    }

    /// Load an event. Local ids never touch the network.
    pub async fn get(&self, id: &EventId) -> StoreResult<Event> {
        if id.is_local() {
            debug!(event_id = %id, "Reading local event");
            return self
                .local
                .read(id.as_str())
                .await?
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() });
        }

        let remote = self.require_remote()?;
        debug!(event_id = %id, "Fetching remote event");
        remote.fetch(id.as_str()).await.inspect_err(|e| {
            warn!(event_id = %id, error = %e, "Failed to fetch event from remote storage");
        })
    }

    /// Replace a stored event wholesale. Remote failures propagate.
    pub async fn update(&self, id: &EventId, event: &Event) -> StoreResult<()> {
        if id.is_local() {
            debug!(event_id = %id, "Writing local event");
            return self.local.write(id.as_str(), event).await;
        }

        let remote = self.require_remote()?;
        remote.replace(id.as_str(), event).await.inspect_err(|e| {
            warn!(event_id = %id, error = %e, "Failed to update event in remote storage");
        })?;
        debug!(event_id = %id, "Updated remote event");
        Ok(())
    }

    fn require_remote(&self) -> StoreResult<&R> {
        self.remote
            .as_ref()
            .ok_or_else(|| StoreError::Unreachable("no remote storage configured".to_string()))
    }
}
