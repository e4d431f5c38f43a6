//! Config command implementations.

use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{settings_path, Settings};
use crate::error::{Error, Result};

use super::load_settings;

/// Execute config commands.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written, or the
/// key/value is invalid.
pub fn execute(command: &ConfigCommands, json: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => show(json),
        ConfigCommands::Set { key, value } => set(key, value, json),
    }
}

fn show(json: bool) -> Result<()> {
    let mut settings = load_settings()?;
    if settings.notify_api_key.is_some() {
        settings.notify_api_key = Some("********".to_string());
    }

    if json {
        println!("{}", serde_json::to_string(&settings)?);
        return Ok(());
    }

    if let Some(path) = settings_path() {
        println!("{}", path.display().to_string().dimmed());
    }
    let value = serde_json::to_value(&settings)?;
    for key in Settings::KEYS {
        let shown = match value.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "(unset)".to_string(),
        };
        println!("  {key:<22} {shown}");
    }
    Ok(())
}

fn set(key: &str, value: &str, json: bool) -> Result<()> {
    let path = settings_path()
        .ok_or_else(|| Error::Config("Could not determine the painel home directory".into()))?;

    // env overrides must not leak into the file
    let mut settings = Settings::load(&path)?;
    settings.set(key, value)?;
    settings.save(&path)?;

    if json {
        println!("{}", serde_json::json!({ "key": key, "value": value.trim(), "saved": true }));
    } else {
        println!("Set {key} = {}", value.trim());
    }
    Ok(())
}
