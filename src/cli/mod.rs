//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Painel CLI - letters and workers dashboard fed by published Google Sheets
#[derive(Parser, Debug)]
#[command(name = "painel", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.painel/data/painel.db)
    #[arg(long, global = true, env = "PAINEL_DB")]
    pub db: Option<PathBuf>,

    /// Actor name recorded in the event log
    #[arg(long, global = true, env = "PAINEL_ACTOR")]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to a published spreadsheet and sync it
    Connect {
        /// Spreadsheet URL (https://docs.google.com/spreadsheets/d/<id>/...)
        url: String,

        /// Custom letters sheet name, tried before the generic fallback
        #[arg(long)]
        sheet: Option<String>,

        /// Form for requesting a block review, shown next to blocked letters
        #[arg(long)]
        block_form: Option<String>,
    },

    /// Re-sync the connected spreadsheet
    Refresh,

    /// Forget the connection and its notification state
    Disconnect,

    /// List letters
    Letters(LettersArgs),

    /// List workers
    Workers {
        /// Name contains (accent and case insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Dashboard counters
    Metrics,

    /// Keep refreshing in the background and raise notifications
    Watch {
        /// Seconds between refreshes (default: pollIntervalSecs setting)
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Hide a record deleted upstream, by identity key
    Hide {
        /// Identity key, as shown by `painel letters --keys`
        key: String,

        /// Label kept with the exclusion
        #[arg(long)]
        label: Option<String>,
    },

    /// Connection, cache and recent sync events
    Status {
        /// Number of events to show
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args, Debug, Default)]
pub struct LettersArgs {
    /// Name contains (accent and case insensitive)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Origin church
    #[arg(long)]
    pub church: Option<String>,

    /// Role label (Pastor, Diácono, Obreiro, Membro, ...)
    #[arg(long)]
    pub role: Option<String>,

    /// Access status
    #[arg(long)]
    pub status: Option<String>,

    /// Emitted on or after (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Emitted on or before, whole day included
    #[arg(long)]
    pub to: Option<String>,

    /// Maximum rows to print
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,

    /// Print a WhatsApp share link under each letter
    #[arg(long)]
    pub share: bool,

    /// Print each letter's identity key (for `painel hide`)
    #[arg(long)]
    pub keys: bool,

    /// List the values available for --church, --role and --status
    #[arg(long)]
    pub options: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,

    /// Set one setting in config.json
    Set {
        /// Setting key (camelCase, as in config.json)
        key: String,

        /// New value; "none" clears optional settings
        value: String,
    },
}
