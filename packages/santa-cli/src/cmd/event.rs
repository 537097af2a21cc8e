//! Event-level commands: create, open, lobby, links, reset

use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use secret_santa::{normalize_names, AccessState, EntryParams, StartOutcome};
use url::Url;

use crate::context::AppContext;

/// Create a new exchange and print everyone's private link
pub async fn create(ctx: &mut AppContext, names: Vec<String>) -> Result<()> {
    let raw = if names.is_empty() {
        prompt_names(ctx)?
    } else {
        names
    };
    let names = normalize_names(&raw)?;

    let id = ctx.session.create_event(&names).await?;
    ctx.remember(&id)?;

    ctx.print_success(&format!("Created event {id} with {} participants", names.len()));
    if ctx.session.is_local() {
        ctx.print_warning("Remote storage unavailable; this event is saved on this device only.");
    }

    print_links(ctx)
}

/// Enter from a shared URL and report where the session landed
pub async fn open(ctx: &mut AppContext, url: &Url) -> Result<()> {
    let params = EntryParams::from_url(url);
    match ctx.session.start(&params).await? {
        StartOutcome::Setup => {
            ctx.print_info("No event in this link. Run `santa create` to start one.");
        }
        StartOutcome::EventNotFound => {
            ctx.print_warning("Event not found");
        }
        StartOutcome::Lobby => {
            if let Some(id) = ctx.session.event_id() {
                ctx.remember(id)?;
            }
            if params.magic_link().is_some() {
                ctx.print_warning("That link's token is not valid. Log in with --name instead.");
            }
            print_lobby(ctx)?;
        }
        StartOutcome::Personal => {
            if let Some(id) = ctx.session.event_id() {
                ctx.remember(id)?;
            }
            super::me::print_view(ctx)?;
        }
    }
    Ok(())
}

pub async fn lobby(ctx: &mut AppContext) -> Result<()> {
    ctx.open_current().await?;
    print_lobby(ctx)
}

pub async fn links(ctx: &mut AppContext) -> Result<()> {
    ctx.open_current().await?;
    print_links(ctx)
}

/// Forget the remembered event; the stored record is kept
pub fn reset(ctx: &mut AppContext) -> Result<()> {
    ctx.session.reset();
    ctx.forget()?;
    ctx.print_success("Cleared the current event. Run `santa create` to start a new one.");
    Ok(())
}

fn print_lobby(ctx: &AppContext) -> Result<()> {
    let entries = ctx.session.lobby()?;
    ctx.print_header("Who's here?");
    for entry in entries {
        let status = match entry.access {
            AccessState::Claimed => style("log in").green(),
            AccessState::Unclaimed => style("set up").yellow(),
        };
        println!("  {:<20} {}", entry.name, status);
    }
    Ok(())
}

fn print_links(ctx: &AppContext) -> Result<()> {
    let links = ctx.session.share_links(&ctx.config.share_url)?;
    ctx.print_header("Private links (send each person only their own)");
    for (name, link) in links {
        println!("  {}", style(name).bold());
        println!("    {link}");
    }
    Ok(())
}

fn prompt_names(ctx: &AppContext) -> Result<Vec<String>> {
    ctx.print_info("Enter participant names, one per line. Leave blank to finish.");
    let mut names = Vec::new();
    loop {
        let name: String = Input::with_theme(&ctx.theme())
            .with_prompt(format!("Participant {}", names.len() + 1))
            .allow_empty(true)
            .interact_text()
            .context("Failed to read participant name")?;
        if name.trim().is_empty() {
            break;
        }
        names.push(name);
    }
    Ok(names)
}
