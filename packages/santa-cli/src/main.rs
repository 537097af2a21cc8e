//! `santa`: run a Secret Santa gift exchange from the terminal.

mod cmd;
mod config;
mod context;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secret_santa::Language;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::config::Config;
use crate::context::{AppContext, AuthArgs};

#[derive(Parser)]
#[command(name = "santa")]
#[command(about = "Secret Santa gift exchange")]
struct Cli {
    /// Event id to use instead of the remembered one
    #[arg(long, global = true)]
    event: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign names and start a new exchange
    Create {
        /// Participant names (prompted when omitted)
        names: Vec<String>,
    },

    /// Enter from a shared URL
    Open { url: Url },

    /// Show who has claimed their spot
    Lobby,

    /// Print every participant's private link
    Links,

    /// Log in and show your assignment
    Login {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Edit your wishlist
    Wish {
        #[command(subcommand)]
        action: WishAction,
    },

    /// Gift ideas for your assignee
    Suggest {
        #[command(flatten)]
        auth: AuthArgs,

        /// Language for the ideas (en, zh, ja, ko, es)
        #[arg(long)]
        lang: Option<Language>,
    },

    /// Forget the current event
    Reset,
}

#[derive(Subcommand)]
enum WishAction {
    /// Add an item
    Add {
        item: String,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Remove an item by its number in `wish ls`
    Rm {
        index: usize,
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// List your items
    Ls {
        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,secret_santa=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(
        blob_url = %config.blob_url,
        local_dir = %config.local_dir.display(),
        offline = config.offline,
        "Configuration loaded"
    );
    let mut ctx = AppContext::new(config, cli.event);

    match cli.command {
        Commands::Create { names } => cmd::event::create(&mut ctx, names).await,
        Commands::Open { url } => cmd::event::open(&mut ctx, &url).await,
        Commands::Lobby => cmd::event::lobby(&mut ctx).await,
        Commands::Links => cmd::event::links(&mut ctx).await,
        Commands::Reset => cmd::event::reset(&mut ctx),
        Commands::Login { auth } => cmd::me::login(&mut ctx, &auth).await,
        Commands::Wish { action } => match action {
            WishAction::Add { item, auth } => cmd::me::wish_add(&mut ctx, &auth, &item).await,
            WishAction::Rm { index, auth } => cmd::me::wish_rm(&mut ctx, &auth, index).await,
            WishAction::Ls { auth } => cmd::me::wish_ls(&mut ctx, &auth).await,
        },
        Commands::Suggest { auth, lang } => cmd::me::suggest(&mut ctx, &auth, lang).await,
    }
}
