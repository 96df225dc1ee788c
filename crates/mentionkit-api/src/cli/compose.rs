//! Message composition and upload CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use uuid::Uuid;

use mentionkit_core::storage::thread_store::ThreadStore;
use mentionkit_infra::filesystem::guess_mime_type;
use mentionkit_types::attachment::Attachment;
use mentionkit_types::mention::ComposedMessage;

use crate::state::AppState;

/// Compose a message. With a thread, the message is also persisted.
pub async fn compose(
    state: &AppState,
    user_id: &str,
    text: &str,
    attachments: &[String],
    thread: Option<&str>,
    json: bool,
) -> Result<()> {
    let (composed, item_id) = match thread {
        Some(thread_id) => {
            let posted = state
                .chat_service
                .post_message(user_id, thread_id, text, attachments)
                .await
                .with_context(|| format!("failed to post to thread '{thread_id}'"))?;
            (posted.composed, Some(posted.item.id))
        }
        None => (
            state.chat_service.compose(user_id, text, attachments).await,
            None,
        ),
    };

    if json {
        let out = serde_json::json!({
            "visible_text": composed.visible_text,
            "injected_blocks": composed.injected_blocks,
            "images": composed.images,
            "payload": composed.to_payload(),
            "item_id": item_id,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print_composed(&composed);
    if let (Some(item_id), Some(thread_id)) = (item_id, thread) {
        println!(
            "  {} Saved as {} in thread {}",
            style("ok").green(),
            style(item_id).dim(),
            style(thread_id).cyan()
        );
        println!();
    }

    Ok(())
}

fn print_composed(composed: &ComposedMessage) {
    println!();
    println!("  {}", style(&composed.visible_text).bold());
    println!();
    if composed.injected_blocks.is_empty() && composed.images.is_empty() {
        println!("  {}", style("(no context injected)").dim());
        println!();
        return;
    }
    for block in &composed.injected_blocks {
        for line in block.lines() {
            println!("  {}", style(line).dim());
        }
        println!();
    }
    for image in &composed.images {
        println!("  {} image {}", style("+").cyan(), image.name);
    }
    if !composed.images.is_empty() {
        println!();
    }
}

/// Copy a file into the upload directory and register its metadata.
pub async fn upload(state: &AppState, user_id: &str, path: &Path, json: bool) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("upload path has no file name")?
        .to_string();

    let id = format!("file_{}", Uuid::now_v7().simple());
    let attachment = Attachment::new(&id, &name, guess_mime_type(&name));

    state
        .chat_service
        .uploads()
        .store(&id, &name, &bytes)
        .await
        .context("failed to store upload")?;
    state
        .chat_service
        .store()
        .save_attachment(user_id, &attachment)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&attachment)?);
    } else {
        println!();
        println!(
            "  {} Uploaded {} as {}",
            style("ok").green(),
            style(&name).cyan(),
            style(&id).bold()
        );
        println!("  Use it with: mkit compose \"...\" --attach {id}");
        println!();
    }

    Ok(())
}
