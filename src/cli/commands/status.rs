//! Status command implementation.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;

use super::{open_storage, session_file};
use crate::error::Result;
use crate::storage::{CacheInfo, Event, ExcludedRecord};

/// Output for status command.
#[derive(Serialize)]
struct StatusOutput {
    connected_url: Option<String>,
    custom_sheet: Option<String>,
    client_id: Option<String>,
    recent_letters: usize,
    cache: Option<CacheInfo>,
    excluded: Vec<ExcludedRecord>,
    events: Vec<Event>,
}

/// Show the persisted connection, cache snapshot, exclusions and the
/// latest sync events. Never touches the network.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute(limit: u32, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let session = session_file().load();
    let storage = open_storage(db_path)?;

    let cache = match &session.client_id {
        Some(id) => storage.cache_info(id)?,
        None => None,
    };
    let output = StatusOutput {
        connected_url: session.url.clone(),
        custom_sheet: session.custom_sheet.clone(),
        client_id: session.client_id.clone(),
        recent_letters: session.recent_letters.len(),
        cache,
        excluded: storage.list_excluded()?,
        events: storage.recent_events(Some(limit))?,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("Painel Status");
    println!("=============");
    println!();
    match &output.connected_url {
        Some(url) => {
            println!("Connected: {url}");
            if let Some(sheet) = &output.custom_sheet {
                println!("  Letters sheet: {sheet}");
            }
        }
        None => {
            println!("Not connected.");
            println!("Connect with: painel connect <spreadsheet-url>");
        }
    }

    if let Some(info) = &output.cache {
        println!(
            "Cache: {} letters, updated {}",
            info.record_count,
            format_millis(info.updated_at)
        );
    }
    if !output.excluded.is_empty() {
        println!("Hidden records: {}", output.excluded.len());
    }

    if !output.events.is_empty() {
        println!();
        println!("{}", "Recent events".cyan().bold());
        for event in &output.events {
            println!(
                "  {} {:<18} {}",
                format_millis(event.created_at).dimmed(),
                event.event_type.as_str(),
                event.detail.as_deref().unwrap_or("")
            );
        }
    }
    Ok(())
}

fn format_millis(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |dt| dt.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string(),
    )
}
