//! # Onyx - Modal Editing Core
//!
//! Command-line driver for the editing core: loads a file, replays a key
//! script through the modal engine and prints the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Delete the first line and show the result
//! cargo run -- notes.md --keys dd
//!
//! # Edit in place, logging each applied command
//! cargo run -- notes.md --keys 'Ahello<Esc>' --write -vv
//!
//! # Inspect the full editor state
//! cargo run -- notes.md --keys 'vjy' --json
//! ```

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use onyx_core::{Config, Dispatcher, parse_keys};

/// Onyx - replay Vim-style keys against a text file
#[derive(Parser, Debug)]
#[command(name = "onyx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to edit (an absent file starts empty)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keys to replay, in Vim notation (e.g. "dd", "ihi<Esc>", "<C-r>")
    #[arg(short, long, value_name = "KEYS", default_value = "")]
    keys: String,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print a JSON snapshot of the editor state instead of the text
    #[arg(long)]
    json: bool,

    /// Write the edited text back to FILE
    #[arg(short, long, requires = "file")]
    write: bool,

    /// Write the effective config (defaults filled in) back to its file
    #[arg(long)]
    save_config: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(log_filter(args.verbose))
        .init();

    tracing::info!("Starting Onyx v{}", env!("CARGO_PKG_VERSION"));

    let output = run(&args)?;
    print!("{}", output);

    Ok(())
}

/// Maps the `-v` count to a log level.
fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Builds the log filter. `RUST_LOG` directives win over `-v`.
fn log_filter(verbose: u8) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(log_level(verbose)).into())
        .from_env_lossy()
}

/// Replays the key script and returns what should be printed.
fn run(args: &Args) -> anyhow::Result<String> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };

    if args.save_config {
        match &args.config {
            Some(path) => config.save_to(path),
            None => config.save(),
        }
        .context("Failed to save config")?;
        tracing::info!("Saved config");
    }

    let text = match &args.file {
        Some(path) if path.exists() => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => String::new(),
    };

    let keys = parse_keys(&args.keys).context("Invalid key script")?;
    let key_count = keys.len();

    let mut dispatcher = Dispatcher::with_config(&text, &config);
    dispatcher.handle_keys(keys);
    tracing::info!(
        "Replayed {} keys, ending in {} mode at {}",
        key_count,
        dispatcher.mode(),
        dispatcher.cursor()
    );

    if args.write && dispatcher.take_dirty() {
        if let Some(path) = &args.file {
            std::fs::write(path, dispatcher.text())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
    }

    if args.json {
        let json = serde_json::to_string_pretty(&dispatcher.snapshot())
            .context("Failed to serialize snapshot")?;
        Ok(json + "\n")
    } else {
        Ok(dispatcher.text())
    }
}
