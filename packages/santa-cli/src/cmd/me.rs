//! Participant commands: personal view, wishlist, gift ideas

use anyhow::{bail, Context, Result};
use console::style;
use secret_santa::{ai::OpenAiSuggester, Language};

use crate::context::{AppContext, AuthArgs};

pub async fn login(ctx: &mut AppContext, auth: &AuthArgs) -> Result<()> {
    ctx.enter(auth).await?;
    print_view(ctx)
}

pub async fn wish_add(ctx: &mut AppContext, auth: &AuthArgs, item: &str) -> Result<()> {
    ctx.enter(auth).await?;
    ctx.session.add_wish(item).await?;
    print_wishlist(ctx)
}

/// Remove by the 1-based number shown in `wish ls`
pub async fn wish_rm(ctx: &mut AppContext, auth: &AuthArgs, number: usize) -> Result<()> {
    if number == 0 {
        bail!("Wishlist items are numbered from 1");
    }
    ctx.enter(auth).await?;
    ctx.session.remove_wish(number - 1).await?;
    print_wishlist(ctx)
}

pub async fn wish_ls(ctx: &mut AppContext, auth: &AuthArgs) -> Result<()> {
    ctx.enter(auth).await?;
    print_wishlist(ctx)
}

pub async fn suggest(ctx: &mut AppContext, auth: &AuthArgs, lang: Option<Language>) -> Result<()> {
    let api_key = ctx
        .config
        .openai_api_key
        .clone()
        .context("Set OPENAI_API_KEY to get gift suggestions")?;
    let suggester = OpenAiSuggester::new(api_key).with_model(&ctx.config.suggest_model);

    ctx.enter(auth).await?;
    let lang = lang.unwrap_or(ctx.config.language);
    let ideas = ctx.session.suggestions(&suggester, lang).await?;

    if ideas.is_empty() {
        ctx.print_warning("No suggestions right now. Try again later.");
        return Ok(());
    }

    ctx.print_header("Gift ideas");
    for idea in ideas {
        println!(
            "  {} {}",
            style(&idea.item).bold(),
            style(format!("({})", idea.estimated_price)).dim()
        );
        println!("    {}", idea.reason);
    }
    Ok(())
}

/// Print the assignment for whoever is logged in.
pub fn print_view(ctx: &AppContext) -> Result<()> {
    let view = ctx
        .session
        .personal_view()
        .context("Not logged in")?;

    ctx.print_header(&format!("Hi {}!", view.me.name));
    println!(
        "  You are giving a gift to {}",
        style(&view.assignee.name).bold().magenta()
    );

    if view.assignee.wishlist.is_empty() {
        println!("  {}", style("They haven't added any wishes yet.").dim());
    } else {
        println!("  Their wishlist:");
        for item in &view.assignee.wishlist {
            println!("    - {item}");
        }
    }
    Ok(())
}

fn print_wishlist(ctx: &AppContext) -> Result<()> {
    let view = ctx
        .session
        .personal_view()
        .context("Not logged in")?;

    ctx.print_header("Your wishlist");
    if view.me.wishlist.is_empty() {
        println!("  {}", style("(empty)").dim());
    }
    for (i, item) in view.me.wishlist.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
    Ok(())
}
