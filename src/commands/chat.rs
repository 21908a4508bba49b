use owo_colors::OwoColorize;
use tokio::io::AsyncWriteExt;

use super::AppContext;
use crate::chat::run_repl;
use crate::error::Result;

/// Start the interactive chat
pub async fn cmd_chat(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.session()?;
    run_repl(&mut session, ctx.renderer()).await
}

/// Answer a single request and exit
pub async fn cmd_ask(ctx: &AppContext, text: &str) -> Result<()> {
    let mut session = ctx.session()?;
    let reply = session.submit(text).await;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{} ", "🤖".bold()).as_bytes())
        .await?;
    ctx.renderer().render(&mut stdout, &reply).await?;
    Ok(())
}
