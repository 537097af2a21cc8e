//! Event session: the composition root for one browsing session.
//!
//! Owns the in-memory event, threads it through pure transformations, and
//! writes the whole event back to the store after every mutation. Writes are
//! persisted first and only then swapped into memory, so a failed update
//! leaves the session showing what the store holds.

use tracing::{info, warn};
use url::Url;

use crate::access::{self, AccessState, Decision, PersonalView};
use crate::assignment::create_assignment;
use crate::error::{AccessError, Result, SantaError};
use crate::event_store::EventStore;
use crate::traits::store::{LocalBackend, RemoteBackend};
use crate::traits::suggest::GiftSuggester;
use crate::types::event::{Event, EventId};
use crate::types::participant::{Participant, ParticipantId};
use crate::types::suggestion::{GiftSuggestion, Language};

/// Access parameters from the entry URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryParams {
    /// Event to load; absent means "create new"
    pub event: Option<EventId>,

    /// Participant requesting magic-link access
    pub uid: Option<ParticipantId>,

    /// That participant's secret token
    pub token: Option<String>,
}

impl EntryParams {
    /// Parse `event`, `uid` and `token` from a query string (leading `?`
    /// optional). Empty values count as absent.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "event" => params.event = Some(EventId::from(value.into_owned())),
                "uid" => params.uid = Some(ParticipantId::from(value.into_owned())),
                "token" => params.token = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Both halves of a magic link, if present.
    pub fn magic_link(&self) -> Option<(&ParticipantId, &str)> {
        match (&self.uid, &self.token) {
            (Some(uid), Some(token)) => Some((uid, token.as_str())),
            _ => None,
        }
    }
}

/// Private link that logs `participant` straight into their personal view.
pub fn share_link(base: &Url, event_id: &EventId, participant: &Participant) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("event", event_id.as_str())
        .append_pair("uid", participant.id.as_str())
        .append_pair("token", &participant.secret_token);
    url
}

/// What the session currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No event loaded; the next step is creating one.
    Home,

    /// An event is loaded and persisted under `id`.
    Active { id: EventId, event: Event },

    /// The requested event could not be loaded. Terminal for this session.
    NotFound { id: EventId },
}

/// Where `start` landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// No event requested: show setup.
    Setup,
    /// Event loaded, nobody authenticated.
    Lobby,
    /// Event loaded and a magic link authenticated a participant.
    Personal,
    /// Event could not be loaded.
    EventNotFound,
}

/// One row of the lobby: who can set up and who must log in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyEntry {
    pub id: ParticipantId,
    pub name: String,
    pub access: AccessState,
}

pub struct EventSession<R, L> {
    store: EventStore<R, L>,
    state: SessionState,
    viewer: Option<ParticipantId>,
}

impl<R: RemoteBackend, L: LocalBackend> EventSession<R, L> {
    pub fn new(store: EventStore<R, L>) -> Self {
        Self {
            store,
            state: SessionState::Home,
            viewer: None,
        }
    }

    pub fn store(&self) -> &EventStore<R, L> {
        &self.store
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn event(&self) -> Option<&Event> {
        match &self.state {
            SessionState::Active { event, .. } => Some(event),
            _ => None,
        }
    }

    pub fn event_id(&self) -> Option<&EventId> {
        match &self.state {
            SessionState::Active { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Whether the loaded event lives only on this device.
    pub fn is_local(&self) -> bool {
        self.event_id().is_some_and(EventId::is_local)
    }

    /// Enter the session from URL-style parameters.
    ///
    /// An event that cannot be loaded (missing, unreachable or unreadable)
    /// lands in the terminal `NotFound` state with no retry. A magic link
    /// that does not resolve falls through to the lobby.
    pub async fn start(&mut self, params: &EntryParams) -> Result<StartOutcome> {
        self.viewer = None;

        let Some(id) = params.event.clone() else {
            self.state = SessionState::Home;
            return Ok(StartOutcome::Setup);
        };

        let event = match self.store.get(&id).await {
            Ok(event) => event,
            Err(e) => {
                warn!(event_id = %id, error = %e, "Event could not be loaded");
                self.state = SessionState::NotFound { id };
                return Ok(StartOutcome::EventNotFound);
            }
        };

        info!(event_id = %id, participants = event.participants.len(), "Loaded event");
        self.state = SessionState::Active { id, event };

        if let Some((uid, token)) = params.magic_link() {
            if self.resolve_magic_link(uid, token).is_ok() {
                return Ok(StartOutcome::Personal);
            }
        }
        Ok(StartOutcome::Lobby)
    }

    /// Assign names, persist the new event, and make it the session's event.
    pub async fn create_event<S: AsRef<str>>(&mut self, names: &[S]) -> Result<EventId> {
        let event = create_assignment(names)?;
        let id = self.store.create(&event).await?;

        info!(event_id = %id, local = id.is_local(), "Started gift exchange");
        self.state = SessionState::Active {
            id: id.clone(),
            event,
        };
        self.viewer = None;
        Ok(id)
    }

    /// Forget the current event. The durable record is left as is; the next
    /// `create_event` gets a new identifier.
    pub fn reset(&mut self) {
        self.state = SessionState::Home;
        self.viewer = None;
    }

    pub fn lobby(&self) -> Result<Vec<LobbyEntry>> {
        let event = self.require_event()?;
        Ok(event
            .participants
            .iter()
            .map(|p| LobbyEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                access: AccessState::of(p),
            })
            .collect())
    }

    pub fn access_state(&self, participant_id: &ParticipantId) -> Result<AccessState> {
        Ok(AccessState::of(self.require_participant(participant_id)?))
    }

    /// Password entry for a participant: setup if unclaimed, login otherwise.
    ///
    /// Setup persists the claimed record before granting access.
    pub async fn authenticate(
        &mut self,
        participant_id: &ParticipantId,
        password: &str,
    ) -> Result<Decision<'_>> {
        let participant = self.require_participant(participant_id)?;

        match AccessState::of(participant) {
            AccessState::Unclaimed => {
                let claimed = access::submit_setup(participant, password)?;
                let next = self.require_event()?.with_participant(claimed);
                self.commit(next).await?;
            }
            AccessState::Claimed => {
                let event = self.require_event()?;
                let decision = access::submit_login(event, participant_id, password)?;
                if let Decision::Deny(reason) = decision {
                    return Ok(Decision::Deny(reason));
                }
            }
        }

        self.viewer = Some(participant_id.clone());
        Ok(Decision::Grant(self.require_view()?))
    }

    /// Passwordless entry via a participant's secret token.
    pub fn resolve_magic_link(
        &mut self,
        uid: &ParticipantId,
        token: &str,
    ) -> Result<PersonalView<'_>> {
        let event = self.require_event()?;
        if access::resolve_magic_link(event, uid, token).is_none() {
            return Err(SantaError::InvalidToken);
        }
        self.viewer = Some(uid.clone());
        self.require_view()
    }

    /// The authenticated participant and their assignee, if anyone is in.
    pub fn personal_view(&self) -> Option<PersonalView<'_>> {
        self.require_view().ok()
    }

    /// Leave the personal view; the event stays loaded.
    pub fn logout(&mut self) {
        self.viewer = None;
    }

    /// Append to the authenticated participant's wishlist and persist.
    pub async fn add_wish(&mut self, item: &str) -> Result<()> {
        let me = self.require_viewer()?;
        let updated = me.with_wish_added(item);
        if updated == *me {
            return Ok(());
        }
        self.save_participant(updated).await
    }

    /// Remove from the authenticated participant's wishlist and persist.
    pub async fn remove_wish(&mut self, index: usize) -> Result<()> {
        let me = self.require_viewer()?;
        let updated = me.with_wish_removed(index);
        if updated == *me {
            return Ok(());
        }
        self.save_participant(updated).await
    }

    /// Replace the authenticated participant's wishlist and persist.
    pub async fn set_wishlist(&mut self, wishlist: Vec<String>) -> Result<()> {
        let updated = self.require_viewer()?.with_wishlist(wishlist);
        self.save_participant(updated).await
    }

    /// Re-send the in-memory event, e.g. after an unreachable update.
    pub async fn sync(&self) -> Result<()> {
        let (id, event) = self.require_active()?;
        self.store.update(id, event).await?;
        Ok(())
    }

    /// Re-fetch the event to pick up changes made from other devices.
    pub async fn reload(&mut self) -> Result<()> {
        let id = self.require_active()?.0.clone();
        let event = self.store.get(&id).await?;
        self.state = SessionState::Active { id, event };
        if self.require_view().is_err() {
            self.viewer = None;
        }
        Ok(())
    }

    /// Private links for every participant, in roster order.
    pub fn share_links(&self, base: &Url) -> Result<Vec<(String, Url)>> {
        let (id, event) = self.require_active()?;
        Ok(event
            .participants
            .iter()
            .map(|p| (p.name.clone(), share_link(base, id, p)))
            .collect())
    }

    /// Gift ideas for the authenticated participant's assignee.
    ///
    /// Provider failures are logged and yield no ideas.
    pub async fn suggestions<G: GiftSuggester + ?Sized>(
        &self,
        suggester: &G,
        lang: Language,
    ) -> Result<Vec<GiftSuggestion>> {
        let view = self.require_view()?;
        match suggester
            .suggest(&view.assignee.name, &view.assignee.wishlist, lang)
            .await
        {
            Ok(ideas) => Ok(ideas),
            Err(e) => {
                warn!(error = %e, "Failed to generate gift suggestions");
                Ok(Vec::new())
            }
        }
    }

    async fn save_participant(&mut self, updated: Participant) -> Result<()> {
        let next = self.require_event()?.with_participant(updated);
        self.commit(next).await
    }

    /// Persist `next` in full, then make it the in-memory event.
    async fn commit(&mut self, next: Event) -> Result<()> {
        let id = self.require_active()?.0.clone();
        self.store.update(&id, &next).await?;
        self.state = SessionState::Active { id, event: next };
        Ok(())
    }

    fn require_active(&self) -> Result<(&EventId, &Event)> {
        match &self.state {
            SessionState::Active { id, event } => Ok((id, event)),
            _ => Err(SantaError::NoActiveEvent),
        }
    }

    fn require_event(&self) -> Result<&Event> {
        Ok(self.require_active()?.1)
    }

    fn require_participant(&self, id: &ParticipantId) -> Result<&Participant> {
        self.require_event()?.participant(id).ok_or_else(|| {
            AccessError::UnknownParticipant {
                id: id.to_string(),
            }
            .into()
        })
    }

    fn require_viewer(&self) -> Result<&Participant> {
        let id = self.viewer.as_ref().ok_or(SantaError::NotAuthenticated)?;
        self.require_participant(id)
    }

    fn require_view(&self) -> Result<PersonalView<'_>> {
        let me = self.require_viewer()?;
        Ok(PersonalView::resolve(self.require_event()?, me)?)
    }
}
