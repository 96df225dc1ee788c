//! Entity registry CLI commands.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use mentionkit_core::mention::composer::render_block;
use mentionkit_types::mention::{Mention, Resolution, ResolvedContext};

use crate::state::AppState;

/// List all registered entities.
pub async fn list_entities(state: &AppState, json: bool) -> Result<()> {
    let records = state.registry().records();

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!("  {} No entities registered.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Id").fg(Color::Cyan),
            Cell::new("Kind").fg(Color::Cyan),
            Cell::new("Fields").fg(Color::Cyan),
        ]);

    for record in &records {
        let fields = record
            .fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&record.id),
            Cell::new(record.kind.to_string()),
            Cell::new(fields),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} entities", style(records.len()).bold());
    println!();

    Ok(())
}

/// Show one entity and the block a mention of it would inject.
pub async fn show_entity(state: &AppState, id: &str, json: bool) -> Result<()> {
    let Some(record) = state.registry().get(id) else {
        bail!("Entity '{id}' not found");
    };

    let marker = state.chat_service.pipeline().scanner().marker();
    let raw_token = format!("{marker}{id}");
    let ctx = ResolvedContext {
        mention: Mention {
            span: (0, raw_token.len()),
            raw_token,
            candidate_id: id.to_string(),
        },
        resolution: Resolution::Found(record.clone()),
    };
    let block = render_block(&ctx);

    if json {
        let out = serde_json::json!({ "entity": record, "block": block });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} ({})",
        style("@").cyan().bold(),
        style(&record.id).bold(),
        record.kind
    );
    println!();
    for line in block.lines() {
        println!("  {}", style(line).dim());
    }
    println!();

    Ok(())
}
