//! Painel CLI entry point.

use clap::Parser;
use painel::cli::commands;
use painel::cli::{Cli, Commands};
use painel::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // --json or non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // RUST_LOG wins over -v
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,hyper=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let db = cli.db.as_ref();
    let actor = cli.actor.as_deref();

    match &cli.command {
        Commands::Connect {
            url,
            sheet,
            block_form,
        } => commands::connection::connect(
            url,
            sheet.as_deref(),
            block_form.as_deref(),
            db,
            actor,
            json,
        ),
        Commands::Refresh => commands::connection::refresh(db, actor, json),
        Commands::Disconnect => commands::connection::disconnect(db, actor, json),

        Commands::Letters(args) => commands::records::letters(args, db, actor, json),
        Commands::Workers { search, limit } => {
            commands::records::workers(search.as_deref(), *limit, db, actor, json)
        }
        Commands::Metrics => commands::records::metrics(db, actor, json),

        Commands::Watch { interval } => commands::watch::execute(*interval, db, actor, json),
        Commands::Hide { key, label } => {
            commands::hide::execute(key, label.as_deref(), db, actor, json)
        }
        Commands::Status { limit } => commands::status::execute(*limit, db, json),
        Commands::Config { command } => commands::config::execute(command, json),

        Commands::Completions { shell } => commands::completions::execute(shell),
        Commands::Version => commands::version::execute(json),
    }
}
