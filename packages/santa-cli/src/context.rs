//! Application context with the event session and shared prompts

use anyhow::{bail, Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Password};
use secret_santa::{
    AccessState, Decision, EntryParams, EventId, EventSession, EventStore, FileStore,
    JsonBlobClient, ParticipantId, SessionState, StartOutcome,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use url::Url;

use crate::config::Config;

pub type Session = EventSession<JsonBlobClient, FileStore>;

/// How a command identifies the participant it acts for
#[derive(Debug, Clone, clap::Args)]
pub struct AuthArgs {
    /// Private link (event, uid and token in the query)
    #[arg(long, conflicts_with = "name")]
    pub link: Option<Url>,

    /// Participant name or id; prompts for a password
    #[arg(long)]
    pub name: Option<String>,
}

/// Event remembered between invocations
#[derive(Debug, Default, Serialize, Deserialize)]
struct Remembered {
    event: Option<EventId>,
}

/// Application context passed to all commands
pub struct AppContext {
    pub config: Config,
    pub session: Session,
    event_override: Option<EventId>,
}

impl AppContext {
    pub fn new(config: Config, event_override: Option<String>) -> Self {
        let local = FileStore::new(&config.local_dir);
        let store = if config.offline {
            EventStore::local_only(local)
        } else {
            EventStore::new(
                JsonBlobClient::new().with_base_url(&config.blob_url),
                local,
            )
        };

        Self {
            session: EventSession::new(store),
            event_override: event_override.map(EventId::from),
            config,
        }
    }

    pub fn theme(&self) -> ColorfulTheme {
        ColorfulTheme::default()
    }

    pub fn print_header(&self, msg: &str) {
        println!();
        println!("{}", style(msg).bold());
    }

    pub fn print_success(&self, msg: &str) {
        println!("{}", style(msg).green());
    }

    pub fn print_warning(&self, msg: &str) {
        println!("{}", style(msg).yellow());
    }

    pub fn print_info(&self, msg: &str) {
        println!("{}", style(msg).cyan());
    }

    /// Event chosen by `--event`, else the one remembered from the last create.
    pub fn current_event(&self) -> Result<EventId> {
        if let Some(id) = &self.event_override {
            return Ok(id.clone());
        }
        load_remembered(&self.config.session_file)?
            .event
            .context("No event selected. Run `santa create` or pass --event")
    }

    pub fn remember(&self, id: &EventId) -> Result<()> {
        save_remembered(
            &self.config.session_file,
            &Remembered {
                event: Some(id.clone()),
            },
        )
    }

    pub fn forget(&self) -> Result<()> {
        save_remembered(&self.config.session_file, &Remembered::default())
    }

    /// Load the current event into the session, without authenticating.
    pub async fn open_current(&mut self) -> Result<()> {
        let params = EntryParams {
            event: Some(self.current_event()?),
            ..Default::default()
        };
        self.start(&params).await.map(|_| ())
    }

    /// Start the session and turn the terminal not-found state into an error.
    pub async fn start(&mut self, params: &EntryParams) -> Result<StartOutcome> {
        let outcome = self.session.start(params).await?;
        if let SessionState::NotFound { id } = self.session.state() {
            bail!("Event {id} not found (or storage is unreachable)");
        }
        Ok(outcome)
    }

    /// Authenticate per `auth` so the session holds a personal view.
    pub async fn enter(&mut self, auth: &AuthArgs) -> Result<()> {
        if let Some(link) = &auth.link {
            let outcome = self.start(&EntryParams::from_url(link)).await?;
            if outcome != StartOutcome::Personal {
                bail!("That link does not grant access to this event");
            }
            return Ok(());
        }

        let Some(who) = &auth.name else {
            bail!("Pass --link <url> or --name <participant>");
        };

        self.open_current().await?;
        let participant_id = self.find_participant(who)?;
        let name = who.clone();

        let password = match self.session.access_state(&participant_id)? {
            AccessState::Unclaimed => {
                self.print_warning(&format!("First visit for {name}: choose a password."));
                Password::with_theme(&self.theme())
                    .with_prompt("New password")
                    .with_confirmation("Repeat password", "Passwords do not match")
                    .interact()?
            }
            AccessState::Claimed => Password::with_theme(&self.theme())
                .with_prompt(format!("Password for {name}"))
                .interact()?,
        };

        match self.session.authenticate(&participant_id, &password).await? {
            Decision::Grant(_) => Ok(()),
            Decision::Deny(_) => bail!("Incorrect password"),
        }
    }

    /// Resolve a participant by exact name, falling back to id.
    pub fn find_participant(&self, who: &str) -> Result<ParticipantId> {
        let event = self.session.event().context("No event loaded")?;
        event
            .participant_named(who)
            .or_else(|| event.participant(&ParticipantId::from(who)))
            .map(|p| p.id.clone())
            .with_context(|| format!("No participant named {who}"))
    }
}

fn load_remembered(path: &Path) -> Result<Remembered> {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Remembered::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn save_remembered(path: &Path, remembered: &Remembered) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, serde_json::to_vec_pretty(remembered)?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remembered_event_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");

        assert!(load_remembered(&path).unwrap().event.is_none());

        save_remembered(
            &path,
            &Remembered {
                event: Some(EventId::from("local_abc")),
            },
        )
        .unwrap();
        assert_eq!(
            load_remembered(&path).unwrap().event,
            Some(EventId::from("local_abc"))
        );

        save_remembered(&path, &Remembered::default()).unwrap();
        assert!(load_remembered(&path).unwrap().event.is_none());
    }
}
