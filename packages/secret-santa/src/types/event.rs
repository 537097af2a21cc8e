//! Event records and event identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::participant::{Participant, ParticipantId};

/// Marker prefix reserved for identifiers minted by the local backend.
pub const LOCAL_PREFIX: &str = "local_";

/// Lifecycle stage of an event. `Setup` → `Active` happens once, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Setup,
    Active,
}

/// One gift exchange: a stage plus its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub stage: Stage,

    pub participants: Vec<Participant>,

    /// Records written before timestamps existed get the load time.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// An active event over fully assigned participants.
    pub fn active(participants: Vec<Participant>) -> Self {
        Self {
            stage: Stage::Active,
            participants,
            created_at: Utc::now(),
        }
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// The participant `giver` gives to, if present in this event.
    pub fn assignee_of(&self, giver: &Participant) -> Option<&Participant> {
        giver
            .assignee_id
            .as_ref()
            .and_then(|id| self.participant(id))
    }

    /// Find a participant by exact name.
    pub fn participant_named(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// New event value with the participant of the same id replaced.
    ///
    /// Unknown ids leave the participant list unchanged.
    pub fn with_participant(&self, updated: Participant) -> Self {
        let participants = self
            .participants
            .iter()
            .map(|p| {
                if p.id == updated.id {
                    updated.clone()
                } else {
                    p.clone()
                }
            })
            .collect();

        Self {
            stage: self.stage,
            participants,
            created_at: self.created_at,
        }
    }
}

/// Opaque identifier locating an event.
///
/// Remote identifiers are whatever the remote backend assigned. Local
/// identifiers carry [`LOCAL_PREFIX`] so reads and writes route back to local
/// storage without any lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Mint a fresh local-namespaced identifier.
    pub fn new_local() -> Self {
        Self(format!("{LOCAL_PREFIX}{}", Uuid::new_v4().simple()))
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
