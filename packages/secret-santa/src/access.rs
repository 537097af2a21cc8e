//! Per-participant access control.
//!
//! Each participant is either `Unclaimed` (no password) or `Claimed`. Setup
//! moves `Unclaimed → Claimed` exactly once; login is only valid afterwards.
//! Magic links (participant id + secret token) bypass passwords entirely and
//! work in either state.
//!
//! Nothing here mutates a participant in place: setup returns the updated
//! record for the caller to fold into its event.

use tracing::{debug, warn};

use crate::error::AccessError;
use crate::types::event::Event;
use crate::types::participant::{Participant, ParticipantId};

/// Where a participant stands in the claim lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Unclaimed,
    Claimed,
}

impl AccessState {
    pub fn of(participant: &Participant) -> Self {
        if participant.is_claimed() {
            AccessState::Claimed
        } else {
            AccessState::Unclaimed
        }
    }
}

/// The authenticated pair shown to one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalView<'a> {
    pub me: &'a Participant,
    pub assignee: &'a Participant,
}

impl<'a> PersonalView<'a> {
    /// View for `me` within `event`.
    pub fn resolve(event: &'a Event, me: &'a Participant) -> Result<Self, AccessError> {
        let assignee = event
            .assignee_of(me)
            .ok_or_else(|| AccessError::MissingAssignee {
                id: me.id.to_string(),
            })?;
        Ok(Self { me, assignee })
    }
}

/// Why a login was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    IncorrectPassword,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision<'a> {
    Grant(PersonalView<'a>),
    Deny(DenyReason),
}

impl Decision<'_> {
    pub fn is_granted(&self) -> bool {
        matches!(self, Decision::Grant(_))
    }
}

/// Claim an account by setting its password.
///
/// Returns the updated participant; the caller persists it and opens the
/// personal view.
pub fn submit_setup(participant: &Participant, password: &str) -> Result<Participant, AccessError> {
    if AccessState::of(participant) == AccessState::Claimed {
        return Err(AccessError::AlreadyClaimed);
    }
    if password.trim().is_empty() {
        return Err(AccessError::EmptyPassword);
    }

    debug!(participant_id = %participant.id, "Participant claimed account");
    Ok(Participant {
        password: Some(password.to_string()),
        is_claimed: true,
        ..participant.clone()
    })
}

/// Check a password for a claimed participant of `event`.
///
/// Exact string comparison; no lockout or rate limiting.
pub fn submit_login<'a>(
    event: &'a Event,
    participant_id: &ParticipantId,
    password: &str,
) -> Result<Decision<'a>, AccessError> {
    let me = event
        .participant(participant_id)
        .ok_or_else(|| AccessError::UnknownParticipant {
            id: participant_id.to_string(),
        })?;

    let Some(stored) = me.password.as_deref() else {
        return Err(AccessError::NotClaimed);
    };

    if stored != password {
        debug!(participant_id = %me.id, "Login denied");
        return Ok(Decision::Deny(DenyReason::IncorrectPassword));
    }

    Ok(Decision::Grant(PersonalView::resolve(event, me)?))
}

/// Resolve a magic link to a personal view.
///
/// Succeeds only when `uid` names a participant whose secret token equals
/// `token` exactly. Claim state is irrelevant.
pub fn resolve_magic_link<'a>(
    event: &'a Event,
    uid: &ParticipantId,
    token: &str,
) -> Option<PersonalView<'a>> {
    let me = event
        .participant(uid)
        .filter(|p| p.secret_token == token);

    let Some(me) = me else {
        warn!(participant_id = %uid, "Invalid access token");
        return None;
    };

    PersonalView::resolve(event, me).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::create_assignment;

    fn event() -> Event {
        create_assignment(&["Ann", "Bo", "Cy"]).unwrap()
    }

    fn claim(event: &Event, idx: usize, password: &str) -> Event {
        let claimed = submit_setup(&event.participants[idx], password).unwrap();
        event.with_participant(claimed)
    }

    #[test]
    fn test_setup_claims_account() {
        let event = event();
        let ann = &event.participants[0];
        assert_eq!(AccessState::of(ann), AccessState::Unclaimed);

        let claimed = submit_setup(ann, "hunter2").unwrap();
        assert_eq!(AccessState::of(&claimed), AccessState::Claimed);
        assert!(claimed.is_claimed);
        assert_eq!(claimed.password.as_deref(), Some("hunter2"));
        assert_eq!(claimed.assignee_id, ann.assignee_id);
        assert_eq!(claimed.secret_token, ann.secret_token);
        // Input untouched.
        assert!(ann.password.is_none());
    }

    #[test]
    fn test_setup_twice_is_caller_error() {
        let event = claim(&event(), 0, "first");
        let err = submit_setup(&event.participants[0], "second").unwrap_err();
        assert_eq!(err, AccessError::AlreadyClaimed);
    }

    #[test]
    fn test_setup_rejects_blank_password() {
        let event = event();
        let err = submit_setup(&event.participants[0], "   ").unwrap_err();
        assert_eq!(err, AccessError::EmptyPassword);
    }

    #[test]
    fn test_setup_then_login_same_password_grants() {
        let event = claim(&event(), 1, "sleigh");
        let bo = &event.participants[1];

        let decision = submit_login(&event, &bo.id, "sleigh").unwrap();
        let Decision::Grant(view) = decision else {
            panic!("expected grant, got {decision:?}");
        };
        assert_eq!(view.me.id, bo.id);
        assert_eq!(Some(&view.assignee.id), bo.assignee_id.as_ref());
        assert_ne!(view.assignee.id, bo.id);
    }

    #[test]
    fn test_login_wrong_password_denied() {
        let event = claim(&event(), 1, "sleigh");
        let bo_id = event.participants[1].id.clone();

        let decision = submit_login(&event, &bo_id, "Sleigh").unwrap();
        assert_eq!(decision, Decision::Deny(DenyReason::IncorrectPassword));
        assert!(!decision.is_granted());
    }

    #[test]
    fn test_login_before_setup_is_caller_error() {
        let event = event();
        let err = submit_login(&event, &event.participants[2].id, "x").unwrap_err();
        assert_eq!(err, AccessError::NotClaimed);
    }

    #[test]
    fn test_login_unknown_participant() {
        let event = event();
        let err = submit_login(&event, &ParticipantId::from("ghost"), "x").unwrap_err();
        assert!(matches!(err, AccessError::UnknownParticipant { .. }));
    }

    #[test]
    fn test_magic_link_requires_matching_uid_and_token() {
        let event = event();
        let ann = &event.participants[0];
        let bo = &event.participants[1];

        let view = resolve_magic_link(&event, &ann.id, &ann.secret_token).unwrap();
        assert_eq!(view.me, ann);
        assert_eq!(Some(&view.assignee.id), ann.assignee_id.as_ref());

        assert!(resolve_magic_link(&event, &ann.id, &bo.secret_token).is_none());
        assert!(resolve_magic_link(&event, &ann.id, "").is_none());
        let ghost = ParticipantId::from("ghost");
        assert!(resolve_magic_link(&event, &ghost, &ann.secret_token).is_none());

        let prefix = &ann.secret_token[..10];
        assert!(resolve_magic_link(&event, &ann.id, prefix).is_none());
    }

    #[test]
    fn test_magic_link_works_when_claimed() {
        let event = claim(&event(), 0, "pw");
        let ann = &event.participants[0];
        assert!(resolve_magic_link(&event, &ann.id, &ann.secret_token).is_some());
    }

    #[test]
    fn test_setup_only_changes_the_claimant() {
        let before = event();
        let after = claim(&before, 0, "pw");
        assert_eq!(after.participants[1], before.participants[1]);
        assert_eq!(after.participants[2], before.participants[2]);
    }
}
