//! Confirmation before destructive cache operations

use super::context::UiContext;
use crate::error::{AgentError, AgentResult};
use console::style;

/// List the generations about to be removed and ask before going ahead.
///
/// `--yes` approves without asking. Without a terminal and without `--yes`
/// the answer is no.
pub async fn confirm_removal(ctx: &UiContext, generations: &[String]) -> AgentResult<bool> {
    println!(
        "This will remove {} cache generation(s):",
        generations.len()
    );
    for name in generations {
        println!("  {} {}", style("•").red(), name);
    }
    println!();

    if ctx.auto_yes() {
        println!("  Removal approved by --yes");
        return Ok(true);
    }
    if !ctx.is_interactive() {
        return Ok(false);
    }

    // cliclack reads stdin synchronously
    let question = format!("Remove {} generation(s)?", generations.len());
    let answer = tokio::task::spawn_blocking(move || {
        cliclack::confirm(question).initial_value(false).interact()
    })
    .await
    .map_err(|e| AgentError::Internal(format!("Prompt task failed: {}", e)))?;

    answer.map_err(|e| AgentError::User(format!("Prompt failed: {}", e)))
}
