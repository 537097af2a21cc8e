//! Participant records and their identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Participant identifier, unique within one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Fresh random id.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(12);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One person in a gift exchange.
///
/// `assignee_id` is set once by the assignment engine and never changes.
/// `secret_token` is generated at creation and never rotates. `password` is
/// absent until the participant claims their account, then immutable.
/// Passwords and tokens are stored and compared in plain form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,

    /// Display name
    pub name: String,

    /// Who this participant gives a gift to
    pub assignee_id: Option<ParticipantId>,

    /// Ordered wishes, visible to whoever gives to this participant
    #[serde(default)]
    pub wishlist: Vec<String>,

    /// Mirrors `password.is_some()`; kept for the stored record format
    #[serde(default)]
    pub is_claimed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Bearer token embedded in the participant's private link
    pub secret_token: String,
}

impl Participant {
    /// New unassigned, unclaimed participant with fresh id and token.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ParticipantId::generate(),
            name: name.into(),
            assignee_id: None,
            wishlist: Vec::new(),
            is_claimed: false,
            password: None,
            secret_token: generate_secret_token(),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.password.is_some()
    }

    /// Copy with one more wish appended. Blank items are ignored.
    pub fn with_wish_added(&self, item: &str) -> Self {
        let item = item.trim();
        let mut next = self.clone();
        if !item.is_empty() {
            next.wishlist.push(item.to_string());
        }
        next
    }

    /// Copy with the wish at `index` removed. Out-of-range is a no-op.
    pub fn with_wish_removed(&self, index: usize) -> Self {
        let mut next = self.clone();
        if index < next.wishlist.len() {
            next.wishlist.remove(index);
        }
        next
    }

    /// Copy with the wishlist replaced wholesale.
    pub fn with_wishlist(&self, wishlist: Vec<String>) -> Self {
        Self {
            wishlist,
            ..self.clone()
        }
    }
}

fn generate_secret_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_is_unclaimed_and_unassigned() {
        let p = Participant::new("Ann");
        assert_eq!(p.name, "Ann");
        assert!(p.assignee_id.is_none());
        assert!(p.wishlist.is_empty());
        assert!(!p.is_claimed());
        assert!(!p.is_claimed);
        assert_eq!(p.secret_token.len(), 64);
    }

    #[test]
    fn test_ids_and_tokens_are_fresh() {
        let a = Participant::new("Ann");
        let b = Participant::new("Ann");
        assert_ne!(a.id, b.id);
        assert_ne!(a.secret_token, b.secret_token);
    }

    #[test]
    fn test_wish_added_trims_and_ignores_blank() {
        let p = Participant::new("Bo");
        let p = p.with_wish_added("  wool socks ");
        let p = p.with_wish_added("   ");
        assert_eq!(p.wishlist, vec!["wool socks".to_string()]);
    }

    #[test]
    fn test_wish_removed_by_index() {
        let p = Participant::new("Cy")
            .with_wish_added("tea")
            .with_wish_added("book")
            .with_wish_added("mug");

        let removed = p.with_wish_removed(1);
        assert_eq!(removed.wishlist, vec!["tea".to_string(), "mug".to_string()]);

        let unchanged = p.with_wish_removed(10);
        assert_eq!(unchanged, p);
    }

    #[test]
    fn test_serialized_field_names() {
        let p = Participant::new("Ann");
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("assigneeId").is_some());
        assert!(json.get("secretToken").is_some());
        assert!(json.get("isClaimed").is_some());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_deserializes_record_without_optional_fields() {
        let json = r#"{"id":"abc1234","name":"Ann","assigneeId":"def5678","secretToken":"tok"}"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.id.as_str(), "abc1234");
        assert_eq!(p.assignee_id, Some(ParticipantId::from("def5678")));
        assert!(p.wishlist.is_empty());
        assert!(p.password.is_none());
    }
}
