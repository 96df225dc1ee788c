//! Action bridge CLI command.

use anyhow::{Context, Result};
use console::style;

use mentionkit_types::action::{ActionRequest, ActionStatus};

use crate::state::AppState;

/// Dispatch an action and print the result.
///
/// With a thread, the reply of an applied action is appended to it.
pub async fn dispatch_action(
    state: &AppState,
    user_id: &str,
    name: &str,
    payload: Option<&str>,
    thread: Option<&str>,
    json: bool,
) -> Result<()> {
    let payload = match payload {
        Some(raw) => serde_json::from_str(raw).context("--payload is not valid JSON")?,
        None => serde_json::json!({}),
    };
    let request = ActionRequest::new(name, payload);

    let result = match thread {
        Some(thread_id) => state
            .chat_service
            .dispatch_action(user_id, thread_id, &request)
            .await
            .with_context(|| format!("failed to record action in thread '{thread_id}'"))?,
        None => state.chat_service.bridge().dispatch(&request),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    match result.status {
        ActionStatus::Ok => {
            println!(
                "  {} {} applied",
                style("ok").green().bold(),
                style(&result.action_name).cyan()
            );
            if let Some(effect) = &result.effect {
                println!("  Effect: {}", style(&effect.name).bold());
                if let Some(progress) = &effect.progress {
                    println!("  Progress: {}", style(progress).dim());
                }
                if let Some(reply) = &effect.reply {
                    println!("  Reply: {reply}");
                }
                println!("  Data: {}", serde_json::to_string(&effect.data)?);
            }
        }
        ActionStatus::Rejected | ActionStatus::Error => {
            let reason = result
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            println!(
                "  {} {} {}: {reason}",
                style("x").red().bold(),
                style(&result.action_name).cyan(),
                result.status
            );
            println!(
                "  Known actions: {}",
                style(state.chat_service.bridge().known_actions().join(", ")).dim()
            );
        }
    }
    println!();

    Ok(())
}
