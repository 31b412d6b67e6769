// SPDX-License-Identifier: MIT
//
// linkpad — a chunk-chain byte editor with keyword highlighting.
//
// This is the host binary around linkpad-core:
//
//   load   → Buffer::read_from (bytes inserted at an advancing cursor)
//   edit   → key script → Session events → compaction after the batch
//   scan   → KeywordSet + scan_document → one line per match
//   show   → scan → highlight spans → ANSI-colored text on stdout
//   save   → Buffer::write_to (whole-file overwrite)
//
// Logging goes to stderr through tracing-subscriber; stdout carries only
// command output.

mod output;
mod script;
mod session;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linkpad_core::{Buffer, KeywordSet, Options, scan_document, spans};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

// ─── Command line ───────────────────────────────────────────────────────────

/// Chunk-chain byte editor with keyword highlighting.
#[derive(Parser)]
#[command(name = "linkpad", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Keyword file, one keyword per line (default: C keywords)
    #[arg(long, global = true)]
    keywords: Option<PathBuf>,

    /// Option directives, e.g. "cc=16 ts=2 noet"
    #[arg(long = "set", global = true, value_name = "DIRECTIVES")]
    set: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print every keyword occurrence as `start..end<TAB>keyword`
    Scan {
        file: PathBuf,
    },
    /// Print the file with keywords highlighted
    Show {
        file: PathBuf,
    },
    /// Apply a key script to the file and save it
    Edit {
        file: PathBuf,

        /// Keys to apply: text plus <Left> <Right> <BS> <Del> <CR> <Tab> <lt>
        #[arg(long, value_name = "SCRIPT")]
        keys: String,
    },
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn load(path: &Path, options: &Options) -> Result<Buffer> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Buffer::read_from(io::BufReader::new(file), options.chunk_capacity)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn save(path: &Path, buffer: &Buffer) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    buffer
        .write_to(&mut writer)
        .with_context(|| format!("failed to write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))
}

fn load_keywords(path: Option<&Path>) -> Result<KeywordSet> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read keyword file {}", path.display()))?;
            KeywordSet::parse_list(&text)
                .with_context(|| format!("bad keyword file {}", path.display()))
        }
        None => Ok(KeywordSet::c_language()?),
    }
}

fn run_scan(path: &Path, options: &Options, keywords: &KeywordSet) -> Result<()> {
    let buffer = load(path, options)?;
    let matches = scan_document(&buffer, keywords)?;
    info!(matches = matches.len(), "scanned {}", path.display());

    let mut out = BufWriter::new(io::stdout().lock());
    output::write_matches(&mut out, &buffer, &matches, keywords)?;
    out.flush()?;
    Ok(())
}

fn run_show(path: &Path, options: &Options, keywords: &KeywordSet) -> Result<()> {
    let buffer = load(path, options)?;
    let matches = scan_document(&buffer, keywords)?;
    let spans = spans(&buffer, &matches)?;

    let mut out = BufWriter::new(io::stdout().lock());
    output::write_highlighted(&mut out, &buffer.to_bytes(), &spans)?;
    out.flush()?;
    Ok(())
}

fn run_edit(path: &Path, options: Options, keys: &str) -> Result<()> {
    let buffer = load(path, &options)?;
    let events = script::parse_keys(keys);
    let mut session = Session::new(buffer, options);
    let removed = session
        .apply_batch(&events)
        .with_context(|| format!("failed to edit {}", path.display()))?;
    debug!(events = events.len(), removed, "applied key script");

    save(path, session.buffer())?;
    info!(bytes = session.buffer().len(), "saved {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut options = Options::default();
    if let Some(directives) = &cli.set {
        options
            .apply_all(directives)
            .context("invalid --set directives")?;
    }
    let keywords = load_keywords(cli.keywords.as_deref())?;
    debug!(?options, keywords = keywords.len(), "configured");

    match &cli.command {
        Command::Scan { file } => run_scan(file, &options, &keywords),
        Command::Show { file } => run_show(file, &options, &keywords),
        Command::Edit { file, keys } => run_edit(file, options, keys),
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    run(cli)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
