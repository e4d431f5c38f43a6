//! Hide command: exclude a record deleted upstream.

use std::path::PathBuf;

use crate::config::default_actor;
use crate::error::{Error, Result};

use super::open_storage;

/// Exclude `key` from views until a resync no longer returns it.
///
/// # Errors
///
/// Returns an error for an empty key or when the database write fails.
pub fn execute(
    key: &str,
    label: Option<&str>,
    db_path: Option<&PathBuf>,
    actor: Option<&str>,
    json: bool,
) -> Result<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::InvalidArgument("identity key cannot be empty".into()));
    }

    let actor = actor.map_or_else(default_actor, str::to_string);
    let mut storage = open_storage(db_path)?;
    let added = storage.exclude_record(key, label, &actor)?;

    if json {
        println!("{}", serde_json::json!({ "key": key, "excluded": added }));
    } else if added {
        println!("Hidden: {key}");
    } else {
        println!("Already hidden: {key}");
    }
    Ok(())
}
