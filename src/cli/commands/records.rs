//! Letters, workers and metrics commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use super::{open_engine, pad, runtime, sync_persisted};
use crate::cli::LettersArgs;
use crate::error::{Error, Result};
use crate::ingest::parse_date;
use crate::model::{LetterRecord, WorkerRecord};
use crate::view::{
    display, search_workers, whatsapp_link, FilterOptions, LetterFilter, Metrics, StatusClass,
};

#[derive(Serialize)]
struct LetterRow<'a> {
    #[serde(flatten)]
    letter: &'a LetterRecord,
    identity_key: String,
    status_class: StatusClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    share_link: Option<String>,
}

#[derive(Serialize)]
struct LettersOutput<'a> {
    letters: Vec<LetterRow<'a>>,
    count: usize,
    total: usize,
    offline: bool,
}

#[derive(Serialize)]
struct WorkersOutput<'a> {
    workers: Vec<&'a WorkerRecord>,
    count: usize,
    total: usize,
}

/// List letters matching the filter flags.
///
/// # Errors
///
/// Returns an error for bad dates, when not connected, or when the sync fails.
pub fn letters(
    args: &LettersArgs,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let filter = build_filter(args)?;
    let engine = open_engine(db_path, actor)?;
    let rt = runtime()?;
    sync_persisted(&engine, &rt)?;

    let all = engine.letters();
    if args.options {
        let options = FilterOptions::from_letters(&all);
        if json {
            println!("{}", serde_json::to_string(&options)?);
        } else {
            println!("Churches: {}", options.churches.join(", "));
            println!("Roles:    {}", options.roles.join(", "));
            println!("Statuses: {}", options.statuses.join(", "));
        }
        return Ok(());
    }

    let matched = filter.apply(&all);
    let shown: Vec<&LetterRecord> = matched.iter().take(args.limit).copied().collect();

    if json {
        let rows = shown
            .iter()
            .map(|l| LetterRow {
                letter: l,
                identity_key: l.identity_key(),
                status_class: StatusClass::classify(&l.status),
                share_link: if args.share { whatsapp_link(l) } else { None },
            })
            .collect();
        let output = LettersOutput {
            letters: rows,
            count: shown.len(),
            total: matched.len(),
            offline: engine.is_offline(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No letters found.");
        return Ok(());
    }

    let block_form = engine.block_form_url();
    println!(
        "{}",
        format!(
            "{} {} {} {} {} {}",
            pad("Emitted", 19),
            pad("Name", 24),
            pad("Church", 18),
            pad("Role", 10),
            pad("Preaching", 12),
            "Status"
        )
        .bold()
    );
    for letter in &shown {
        let class = StatusClass::classify(&letter.status);
        println!(
            "{} {} {} {} {} {}",
            pad(display(&letter.emitted_at), 19),
            pad(display(&letter.name), 24),
            pad(display(&letter.origin_church), 18),
            pad(display(&letter.role), 10),
            pad(display(&letter.preaching_date), 12),
            class.paint(display(&letter.status))
        );
        if class == StatusClass::Blocked {
            if !crate::model::is_absent(&letter.block_reason) {
                println!("    {}", letter.block_reason.dimmed());
            }
            if let Some(form) = &block_form {
                println!("    Request review: {form}");
            }
        }
        if args.share {
            if let Some(link) = whatsapp_link(letter) {
                println!("    {}", link.dimmed());
            }
        }
        if args.keys {
            println!("    key: {}", letter.identity_key().dimmed());
        }
    }

    if matched.len() > shown.len() {
        println!(
            "{}",
            format!("({} of {} shown)", shown.len(), matched.len()).dimmed()
        );
    }
    if engine.is_offline() {
        println!("{}", "Offline: cached letters only".yellow());
    }
    Ok(())
}

/// List workers, optionally filtered by name.
///
/// # Errors
///
/// Returns an error when not connected or when the sync fails.
pub fn workers(
    search: Option<&str>,
    limit: usize,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let engine = open_engine(db_path, actor)?;
    let rt = runtime()?;
    sync_persisted(&engine, &rt)?;

    let all = engine.workers();
    let matched = search_workers(&all, search);
    let shown: Vec<&WorkerRecord> = matched.iter().take(limit).copied().collect();

    if json {
        let output = WorkersOutput {
            count: shown.len(),
            total: matched.len(),
            workers: shown,
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    if !engine.has_workers() {
        println!("No workers sheet found.");
        return Ok(());
    }
    if shown.is_empty() {
        println!("No workers found.");
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{} {} {} {} {}",
            pad("Name", 24),
            pad("Role", 10),
            pad("Church", 18),
            pad("Field", 14),
            "Status"
        )
        .bold()
    );
    for worker in &shown {
        println!(
            "{} {} {} {} {}",
            pad(display(&worker.name), 24),
            pad(display(&worker.role), 10),
            pad(display(&worker.church), 18),
            pad(display(&worker.field), 14),
            StatusClass::classify(&worker.status).paint(display(&worker.status))
        );
    }
    Ok(())
}

/// Print dashboard counters.
///
/// # Errors
///
/// Returns an error when not connected or when the sync fails.
pub fn metrics(db_path: Option<&PathBuf>, actor: Option<&str>, json: bool) -> Result<()> {
    let engine = open_engine(db_path, actor)?;
    let rt = runtime()?;
    sync_persisted(&engine, &rt)?;

    let today = chrono::Local::now().date_naive();
    let m = Metrics::compute(&engine.letters(), &engine.workers(), today);

    if json {
        println!("{}", serde_json::to_string(&m)?);
        return Ok(());
    }

    println!("{}", "Painel".cyan().bold());
    println!("  Letters:      {}", m.total_letters);
    println!("  Today:        {}", m.letters_today);
    println!("  Last 7 days:  {}", m.letters_last_7_days);
    println!("  Workers:      {}", m.total_workers);
    if !m.by_role.is_empty() {
        println!();
        println!("{}", "By role".cyan().bold());
        for rc in &m.by_role {
            println!("  {} {}", pad(&rc.role, 16), rc.count);
        }
    }
    Ok(())
}

fn build_filter(args: &LettersArgs) -> Result<LetterFilter> {
    Ok(LetterFilter {
        search: args.search.clone(),
        church: args.church.clone(),
        role: args.role.clone(),
        status: args.status.clone(),
        from: args.from.as_deref().map(date_arg).transpose()?,
        to: args.to.as_deref().map(date_arg).transpose()?,
    })
}

fn date_arg(value: &str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| Error::InvalidArgument(format!("invalid date: {value}")))
}
