//! Watch command: periodic silent refresh with notifications.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;

use super::{load_settings, open_engine, runtime};
use crate::error::{Error, Result};
use crate::sync::{poll, ConnectOutcome};

/// Refresh the persisted connection until Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::NotConnected`] without a persisted connection.
pub fn execute(
    interval: Option<u64>,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let settings = load_settings()?;
    let engine = open_engine(db_path, actor)?;
    let url = engine.session_url().ok_or(Error::NotConnected)?;
    let every = interval.map_or_else(|| settings.poll_interval(), Duration::from_secs);

    if !json {
        println!(
            "Watching {} every {}s (Ctrl-C to stop)",
            url.cyan(),
            every.as_secs()
        );
    }

    let rt = runtime()?;
    let cycles = rt.block_on(poll(
        &engine,
        every,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        },
        |outcome| {
            print_cycle(outcome, json);
            ControlFlow::Continue(())
        },
    ));

    tracing::info!(cycles, "watch finished");
    Ok(())
}

fn print_cycle(outcome: &ConnectOutcome, json: bool) {
    let now = chrono::Local::now().format("%H:%M:%S");
    if json {
        let line = match outcome {
            ConnectOutcome::Connected(r) => serde_json::json!({
                "at": now.to_string(), "state": "connected",
                "letters": r.letters, "workers": r.workers, "notifications": r.notifications,
            }),
            ConnectOutcome::Offline(r) => serde_json::json!({
                "at": now.to_string(), "state": "offline", "letters": r.letters,
            }),
            ConnectOutcome::Failed(message) => serde_json::json!({
                "at": now.to_string(), "state": "failed", "error": message,
            }),
            ConnectOutcome::Skipped | ConnectOutcome::Stale => serde_json::json!({
                "at": now.to_string(), "state": "skipped",
            }),
        };
        println!("{line}");
        return;
    }

    match outcome {
        ConnectOutcome::Connected(r) if r.notifications > 0 => println!(
            "{} {} letters, {}",
            now.to_string().dimmed(),
            r.letters,
            "new letters arrived".green().bold()
        ),
        ConnectOutcome::Connected(r) => {
            println!("{} {} letters", now.to_string().dimmed(), r.letters);
        }
        ConnectOutcome::Offline(r) => println!(
            "{} {} ({} cached letters)",
            now.to_string().dimmed(),
            "offline".yellow(),
            r.letters
        ),
        ConnectOutcome::Failed(message) => {
            println!("{} {}", now.to_string().dimmed(), message.red());
        }
        ConnectOutcome::Skipped | ConnectOutcome::Stale => {}
    }
}
