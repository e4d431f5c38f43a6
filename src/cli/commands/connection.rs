//! Connect, refresh and disconnect commands.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use super::{open_engine, report_or_error, runtime, session_file, sync_persisted, Engine};
use crate::error::{Error, Result};
use crate::sheets::extract_spreadsheet_id;
use crate::sync::SyncReport;
use crate::view::display;

#[derive(Serialize)]
struct SyncOutput<'a> {
    url: Option<String>,
    offline: bool,
    #[serde(flatten)]
    report: &'a SyncReport,
}

/// Connect to `url` and run a first, non-silent sync.
///
/// # Errors
///
/// Returns an error for an invalid URL, or when no sheet data and no cache
/// are available.
pub fn connect(
    url: &str,
    sheet: Option<&str>,
    block_form: Option<&str>,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    if extract_spreadsheet_id(url).is_none() {
        return Err(Error::InvalidUrl { url: url.to_string() });
    }

    let engine = open_engine(db_path, actor)?;
    let rt = runtime()?;
    let outcome = rt.block_on(engine.connect(url, sheet, false));
    let report = report_or_error(outcome, &engine)?;

    if let Some(form) = block_form {
        let file = session_file();
        let mut state = file.load();
        state.block_form_url = Some(form.to_string());
        file.save(&state)?;
    }

    print_report(&engine, &report, json)
}

/// Re-sync the persisted connection.
///
/// # Errors
///
/// Returns an error if not connected or the sync fails without cache.
pub fn refresh(db_path: Option<&PathBuf>, actor: Option<&str>, json: bool) -> Result<()> {
    let engine = open_engine(db_path, actor)?;
    let rt = runtime()?;
    let report = sync_persisted(&engine, &rt)?;
    print_report(&engine, &report, json)
}

/// Drop the connection.
///
/// # Errors
///
/// Returns an error if the engine cannot be opened.
pub fn disconnect(db_path: Option<&PathBuf>, actor: Option<&str>, json: bool) -> Result<()> {
    let engine = open_engine(db_path, actor)?;
    let was = engine.session_url();
    engine.disconnect();

    if json {
        let output = serde_json::json!({ "disconnected": true, "url": was });
        println!("{output}");
    } else if let Some(url) = was {
        println!("Disconnected from {url}");
    } else {
        println!("Not connected.");
    }
    Ok(())
}

fn print_report(engine: &Engine, report: &SyncReport, json: bool) -> Result<()> {
    let offline = engine.is_offline();
    if json {
        let output = SyncOutput {
            url: engine.session_url(),
            offline,
            report,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if offline {
        println!(
            "{} serving {} cached letters",
            "Offline:".yellow().bold(),
            report.letters
        );
        if let Some(error) = engine.last_error() {
            println!("  {}", error.dimmed());
        }
        return Ok(());
    }

    println!("{}", "Connected".green().bold());
    println!(
        "  Letters: {} ({})",
        report.letters,
        report.letters_sheet.as_deref().unwrap_or("no sheet")
    );
    println!(
        "  Workers: {} ({})",
        report.workers,
        report.workers_sheet.as_deref().unwrap_or("no sheet")
    );
    if report.access_merged {
        println!("  Access status merged");
    }
    if report.notifications > 0 {
        println!("  {}", "New letters since the last sync".cyan());
    }

    if !report.digest.is_empty() {
        println!();
        println!("{}", "Recent letters".cyan().bold());
        for letter in &report.digest {
            println!(
                "  {}  {}  {}",
                display(&letter.emitted_at).dimmed(),
                display(&letter.name),
                display(&letter.destination_church)
            );
        }
    }
    Ok(())
}
