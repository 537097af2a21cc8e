//! Secret Santa gift exchanges.
//!
//! Assigns each participant one other participant to gift, persists the
//! result, and gives every participant private access to their own
//! assignment by password or by magic link.
//!
//! # Usage
//!
//! ```rust,ignore
//! use secret_santa::{EventSession, EventStore, FileStore, JsonBlobClient};
//!
//! let store = EventStore::new(JsonBlobClient::new(), FileStore::new(".santa"));
//! let mut session = EventSession::new(store);
//!
//! let id = session.create_event(&["Ann", "Bo", "Cy"]).await?;
//! for (name, link) in session.share_links(&base_url)? {
//!     println!("{name}: {link}");
//! }
//! ```
//!
//! # Modules
//!
//! - [`assignment`] - Derangement generation (single gift cycle)
//! - [`event_store`] - Remote-first persistence with local fallback on create
//! - [`access`] - Password setup/login and magic-link resolution
//! - [`session`] - Orchestration of one browsing session
//! - [`roster`] - Name normalization ahead of assignment
//! - [`stores`] - Local and remote backends
//! - [`ai`] - Gift suggestion providers
//! - [`testing`] - Mock backends for tests

pub mod access;
pub mod ai;
pub mod assignment;
pub mod error;
pub mod event_store;
pub mod roster;
pub mod session;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

pub use access::{AccessState, Decision, DenyReason, PersonalView};
pub use assignment::{create_assignment, create_assignment_with_rng, MIN_PARTICIPANTS};
pub use error::{AccessError, Result, SantaError, StoreError};
pub use event_store::EventStore;
pub use roster::normalize_names;
pub use session::{share_link, EntryParams, EventSession, LobbyEntry, SessionState, StartOutcome};
pub use stores::{FileStore, MemoryStore};
pub use traits::{
    store::{LocalBackend, RemoteBackend},
    suggest::GiftSuggester,
};
pub use types::{
    event::{Event, EventId, Stage, LOCAL_PREFIX},
    participant::{Participant, ParticipantId},
    suggestion::{GiftSuggestion, Language},
};

pub use jsonblob_client::JsonBlobClient;
