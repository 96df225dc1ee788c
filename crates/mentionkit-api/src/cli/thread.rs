//! Thread CLI subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use mentionkit_types::thread::{ItemRole, SortOrder};

use crate::state::AppState;

/// Thread subcommands.
#[derive(Subcommand)]
pub enum ThreadCommand {
    /// List your threads, newest first.
    List {
        /// Maximum number of threads.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show the items of a thread.
    Show {
        /// Thread id.
        id: String,

        /// Maximum number of items (defaults to `history_limit`).
        #[arg(long)]
        limit: Option<u32>,

        /// Newest items first.
        #[arg(long)]
        desc: bool,

        /// Also print the composed payload of user items.
        #[arg(long)]
        payload: bool,
    },

    /// Delete a thread and all of its items.
    #[command(alias = "rm")]
    Delete {
        /// Thread id.
        id: String,
    },
}

/// Handle a thread subcommand.
pub async fn handle_thread_command(
    cmd: ThreadCommand,
    state: &AppState,
    user_id: &str,
    json: bool,
) -> Result<()> {
    match cmd {
        ThreadCommand::List { limit } => list_threads(state, user_id, limit, json).await,
        ThreadCommand::Show {
            id,
            limit,
            desc,
            payload,
        } => {
            let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
            show_thread(state, user_id, &id, limit, order, payload, json).await
        }
        ThreadCommand::Delete { id } => delete_thread(state, user_id, &id, json).await,
    }
}

async fn list_threads(state: &AppState, user_id: &str, limit: Option<u32>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(state.config.history_limit);
    let threads = state.chat_service.list_threads(user_id, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&threads)?);
        return Ok(());
    }

    if threads.is_empty() {
        println!();
        println!(
            "  {} No threads for {}.",
            style("i").blue().bold(),
            style(user_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for thread in &threads {
        table.add_row(vec![
            Cell::new(&thread.id),
            Cell::new(thread.title.as_deref().unwrap_or("-")),
            Cell::new(thread.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!("{table}");
    println!();

    Ok(())
}

async fn show_thread(
    state: &AppState,
    user_id: &str,
    thread_id: &str,
    limit: Option<u32>,
    order: SortOrder,
    show_payload: bool,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(state.config.history_limit);
    let items = state
        .chat_service
        .history(user_id, thread_id, limit, order)
        .await
        .with_context(|| format!("Thread '{thread_id}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!();
    for item in &items {
        let who = match item.role {
            ItemRole::User => style("user").cyan().bold(),
            ItemRole::Assistant => style("assistant").magenta().bold(),
        };
        println!(
            "  {} {} {}",
            style(item.created_at.format("%H:%M:%S")).dim(),
            who,
            item.text
        );
        if !item.attachment_ids.is_empty() {
            println!(
                "    {} {}",
                style("attachments:").dim(),
                item.attachment_ids.join(", ")
            );
        }
        if show_payload {
            if let Some(payload) = &item.composed_payload {
                for line in payload.lines() {
                    println!("    {}", style(line).dim());
                }
            }
        }
    }
    if items.is_empty() {
        println!("  {}", style("(empty thread)").dim());
    }
    println!();

    Ok(())
}

async fn delete_thread(state: &AppState, user_id: &str, thread_id: &str, json: bool) -> Result<()> {
    state.chat_service.delete_thread(user_id, thread_id).await?;

    if json {
        println!("{}", serde_json::json!({ "deleted": thread_id }));
    } else {
        println!();
        println!(
            "  {} Deleted thread {}",
            style("ok").green(),
            style(thread_id).cyan()
        );
        println!();
    }

    Ok(())
}
