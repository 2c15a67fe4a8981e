//! Application orchestrator.
//! Loads/merges config, initializes logging, dispatches the subcommand, and
//! installs the signal handler for writes once their payload is read.

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use durable_write::cli::{Args, Command};
use durable_write::config::{load_or_init, LoadResult, CONFIG_ENV};
use durable_write::output as out;
use durable_write::{default_config_path, generate, shutdown, AtomicWriter, Charset, Config};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // print-config runs before logging init and never touches the disk
    if let Command::PrintConfig = args.command {
        print_config();
        return Ok(());
    }

    let mut cfg = match load_or_init()? {
        LoadResult::Loaded(cfg) => cfg,
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template durable_write config was written to: {}",
                path.display()
            ));
            out::print_info(&format!(
                "Edit it to change defaults. To use a different location set {CONFIG_ENV}."
            ));
            Config::default()
        }
        LoadResult::Defaults => Config::default(),
    };

    // CLI wins over XML
    args.apply_overrides(&mut cfg);
    cfg.validate()?;

    // Held until run returns so every line, including a final error, reaches the log file
    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json)
        .inspect_err(|e| out::print_error(&format!("Failed to initialize logging: {e}")))?;

    debug!(?args, "Starting durable_write");

    match &args.command {
        Command::Write {
            target,
            input,
            mode,
            parents,
        } => run_write(&cfg, target, input.as_deref(), mode.unwrap_or(cfg.default_mode), *parents),
        Command::Name { length, charset } => run_name(*charset, *length),
        Command::PrintConfig => Ok(()),
    }
}

/// Route SIGINT to the shutdown flag. Installed only once the payload is in
/// memory; until then the default disposition ends the process (e.g. while
/// blocked reading stdin).
fn install_interrupt_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        shutdown::request();
        out::print_warn("Received interrupt; finishing the current step before exiting...");
    })
    .context("install signal handler")
}

fn print_config() {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            PathBuf::from(explicit).display()
        ));
        out::print_info(&format!(
            "To override, unset {CONFIG_ENV} or set it to another file."
        ));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!(
                "Default durable_write config path:\n  {}\n",
                p.display()
            ));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run any other command to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path."),
    }
}

fn read_payload(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            fs::read(path).with_context(|| format!("read input '{}'", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("read payload from stdin")?;
            Ok(buf)
        }
    }
}

fn run_write(
    cfg: &Config,
    target: &Path,
    input: Option<&Path>,
    mode: u32,
    parents: bool,
) -> Result<()> {
    let payload = read_payload(input)?;
    install_interrupt_handler()?;

    if parents
        && let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent directory '{}'", parent.display()))?;
    }

    let writer = AtomicWriter::from_config(cfg);
    match writer.write_atomically(target, &payload, mode) {
        Ok(()) => {
            let shown = dunce::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
            info!(path = %shown.display(), bytes = payload.len(), mode = %format!("{mode:04o}"), "Write committed");
            out::print_success(&format!("wrote {} bytes to {}", payload.len(), shown.display()));
            Ok(())
        }
        Err(e) => {
            let code = e.code();
            match e.step() {
                Some(step) => error!(code, %step, error = %e, "Atomic write failed"),
                None => error!(code, error = %e, "Atomic write failed"),
            }
            Err(e.into())
        }
    }
}

fn run_name(charset: Charset, length: usize) -> Result<()> {
    let name = generate(charset, length)?;
    debug!(%charset, length, "Generated name");
    out::print_user(&name);
    Ok(())
}
