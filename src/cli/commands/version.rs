//! Version command implementation.

use serde::Serialize;

use crate::config::painel_home;
use crate::error::Result;

#[derive(Serialize)]
struct VersionOutput {
    version: &'static str,
    build: &'static str,
    home: Option<String>,
}

/// Print the version, build profile and home directory.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
        home: painel_home().map(|p| p.display().to_string()),
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("painel {} ({})", output.version, output.build);
        if let Some(home) = &output.home {
            println!("home: {home}");
        }
    }
    Ok(())
}
