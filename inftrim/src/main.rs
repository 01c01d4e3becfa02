//! Trim INF-style configuration files and module directories.
//!
//! `inftrim patch` filters a sectioned file through the rules in
//! `inftrim.toml`; `inftrim prune` deletes modules whose imports are missing
//! until the directory is self-consistent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use inftrim::check::check_file;
use inftrim::exit_codes;
use inftrim::io::config::{Config, DEFAULT_CONFIG_FILE, load_config, write_config};
use inftrim::io::imports::PeImportExtractor;
use inftrim::logging;
use inftrim::patch::{PatchOptions, patch_file};
use inftrim::prune::{PruneOptions, prune_dir};

const DIFF_INDENT: &str = "  | ";

#[derive(Parser)]
#[command(
    name = "inftrim",
    version,
    about = "Trim INF-style configuration files and module directories"
)]
struct Cli {
    /// Config file (missing file means defaults).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Debug logging on stderr (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter a sectioned file through the `[patch]` rules.
    Patch {
        file: PathBuf,
        /// Print the diff but leave the file untouched.
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Do not print the diff.
        #[arg(short, long)]
        quiet: bool,
    },
    /// Delete modules in DIR whose imports are missing, until none remain.
    Prune {
        dir: PathBuf,
        /// Report removals without deleting anything.
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Print the report as JSON on stdout.
        #[arg(long)]
        json: bool,
    },
    /// Check that a file uses a supported sectioned format.
    Check { file: PathBuf },
    /// Write the default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Patch {
            file,
            dry_run,
            quiet,
        } => cmd_patch(&cli.config, &file, dry_run, quiet),
        Command::Prune { dir, dry_run, json } => cmd_prune(&cli.config, &dir, dry_run, json),
        Command::Check { file } => cmd_check(&file),
        Command::InitConfig { force } => cmd_init_config(&cli.config, force),
    }
}

fn cmd_patch(config: &Path, file: &Path, dry_run: bool, quiet: bool) -> Result<()> {
    let cfg = load_config(config)?;
    let rules = cfg.patch.rule_set()?;
    let outcome = patch_file(file, &rules, PatchOptions { dry_run })
        .with_context(|| format!("patch {}", file.display()))?;
    if !quiet && outcome.changed() {
        print!("{}", outcome.diff_colored(DIFF_INDENT));
    }
    Ok(())
}

fn cmd_prune(config: &Path, dir: &Path, dry_run: bool, json: bool) -> Result<()> {
    let cfg = load_config(config)?;
    let report = prune_dir(dir, &cfg.prune, &PeImportExtractor, PruneOptions { dry_run })
        .with_context(|| format!("prune {}", dir.display()))?;
    if json {
        let mut payload = serde_json::to_string_pretty(&report).context("serialize report")?;
        payload.push('\n');
        print!("{payload}");
        return Ok(());
    }
    for removal in &report.outcome.removals {
        println!(
            "round {}: {} (missing {})",
            removal.round,
            removal.module,
            removal.missing.join(", ")
        );
    }
    println!(
        "{} of {} modules retained",
        report.outcome.retained.len(),
        report.modules
    );
    Ok(())
}

fn cmd_check(file: &Path) -> Result<()> {
    let report = check_file(file)?;
    println!(
        "{}: {} sections ({} headers), {} lines, {:?} line endings",
        file.display(),
        report.sections,
        report.headers,
        report.lines,
        report.line_ending
    );
    Ok(())
}

fn cmd_init_config(config: &Path, force: bool) -> Result<()> {
    if !force && config.exists() {
        bail!("{} already exists (use --force to overwrite)", config.display());
    }
    write_config(config, &Config::default())?;
    info!(path = %config.display(), "wrote default config");
    Ok(())
}
