//! Testing utilities including mock implementations.
//!
//! These let applications exercise event flows without network access or
//! real AI calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Result, SantaError, StoreError};
use crate::traits::store::{RemoteBackend, StoreResult};
use crate::traits::suggest::GiftSuggester;
use crate::types::event::Event;
use crate::types::suggestion::{GiftSuggestion, Language};

/// Record of a call made to the mock remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRemoteCall {
    Create,
    Fetch { id: String },
    Replace { id: String },
}

/// In-memory stand-in for remote blob storage.
///
/// Clones share the same documents, so two sessions built from clones of one
/// mock behave like two devices talking to the same service.
#[derive(Clone, Default)]
pub struct MockRemote {
    /// Stored documents as JSON text, by id
    docs: Arc<RwLock<HashMap<String, String>>>,

    /// When set, every call fails as unreachable
    offline: Arc<AtomicBool>,

    /// Id sequence for created documents
    next_seq: Arc<AtomicU64>,

    /// One-shot override for the next created id
    next_id: Arc<RwLock<Option<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockRemoteCall>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            next_seq: Arc::new(AtomicU64::new(1_000_000)),
            ..Default::default()
        }
    }

    /// Force the id returned by the next successful create.
    pub fn with_next_id(self, id: impl Into<String>) -> Self {
        *self
            .next_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(id.into());
        self
    }

    /// Simulate network loss (or recovery).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockRemoteCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, call: MockRemoteCall) -> StoreResult<()> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unreachable("mock remote is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for MockRemote {
    async fn create(&self, event: &Event) -> StoreResult<String> {
        self.record(MockRemoteCall::Create)?;

        let forced = self
            .next_id
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let id = forced.unwrap_or_else(|| self.next_seq.fetch_add(1, Ordering::SeqCst).to_string());

        let json = serde_json::to_string(event)?;
        self.docs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), json);
        Ok(id)
    }

    async fn fetch(&self, id: &str) -> StoreResult<Event> {
        self.record(MockRemoteCall::Fetch { id: id.to_string() })?;

        let json = self
            .docs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn replace(&self, id: &str, event: &Event) -> StoreResult<()> {
        self.record(MockRemoteCall::Replace { id: id.to_string() })?;

        let json = serde_json::to_string(event)?;
        let mut docs = self.docs.write().unwrap_or_else(PoisonError::into_inner);
        match docs.get_mut(id) {
            Some(doc) => {
                *doc = json;
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }
}

/// Record of a call made to the mock suggester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSuggestCall {
    pub recipient_name: String,
    pub wishlist: Vec<String>,
    pub lang: Language,
}

/// A mock gift suggester returning canned ideas.
#[derive(Clone, Default)]
pub struct MockSuggester {
    suggestions: Vec<GiftSuggestion>,
    fail: bool,
    calls: Arc<RwLock<Vec<MockSuggestCall>>>,
}

impl MockSuggester {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned suggestion.
    pub fn with_suggestion(mut self, item: &str, reason: &str, estimated_price: &str) -> Self {
        self.suggestions.push(GiftSuggestion {
            item: item.to_string(),
            reason: reason.to_string(),
            estimated_price: estimated_price.to_string(),
        });
        self
    }

    /// Make every call fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MockSuggestCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl GiftSuggester for MockSuggester {
    async fn suggest(
        &self,
        recipient_name: &str,
        wishlist: &[String],
        lang: Language,
    ) -> Result<Vec<GiftSuggestion>> {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockSuggestCall {
                recipient_name: recipient_name.to_string(),
                wishlist: wishlist.to_vec(),
                lang,
            });

        if self.fail {
            return Err(SantaError::Suggestion("mock suggester failure".into()));
        }
        Ok(self.suggestions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::create_assignment;

    #[tokio::test]
    async fn test_mock_remote_ids_are_sequential_and_shared_between_clones() {
        let remote = MockRemote::new();
        let other = remote.clone();
        let event = create_assignment(&["Ann", "Bo", "Cy"]).unwrap();

        let a = remote.create(&event).await.unwrap();
        let b = other.create(&event).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(remote.len(), 2);
        assert_eq!(other.fetch(&a).await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_mock_remote_replace_requires_existing_doc() {
        let remote = MockRemote::new();
        let event = create_assignment(&["Ann", "Bo", "Cy"]).unwrap();
        let err = remote.replace("nope", &event).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mock_suggester_records_calls() {
        let suggester = MockSuggester::new().with_suggestion("Tea", "Likes tea", "$15");
        let ideas = suggester
            .suggest("Bo", &["tea".to_string()], Language::Ko)
            .await
            .unwrap();

        assert_eq!(ideas.len(), 1);
        assert_eq!(suggester.calls()[0].recipient_name, "Bo");
        assert_eq!(suggester.calls()[0].lang, Language::Ko);
    }
}
