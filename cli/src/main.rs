//! CLI entrypoint for outlog
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use outlog_application::Logger;
use outlog_domain::{OutputFormat as DomainOutputFormat, Severity, config::validation::has_errors};
use outlog_infrastructure::{ConfigLoader, FileConfig, open_store};
use outlog_presentation::{Cli, Command, ConsoleFormatter, LineStyle, LogSnapshot, SessionRepl};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting outlog");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => eprintln!("Config error: {}", issue.message),
        }
    }
    if has_errors(&issues) {
        let count = issues.iter().filter(|i| i.is_error()).count();
        bail!("Invalid configuration ({} error(s))", count);
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let color = !cli.no_color && config.output.color;

    match cli.command {
        Command::Config => print_config(&config, cli.config.as_deref(), cli.no_config)?,
        Command::Emit { lines } => emit_lines(&open_logger(&config)?, &lines)?,
        Command::Clear => open_logger(&config)?.try_clear()?,
        Command::Show { format, numbered } => {
            let logger = open_logger(&config)?;
            let buffer = logger.try_buffer()?;
            let format = format
                .map(DomainOutputFormat::from)
                .or(config.output.format)
                .unwrap_or_default();
            match format {
                DomainOutputFormat::Plain => {
                    let style = LineStyle::default()
                        .with_numbers(numbered || config.output.numbered)
                        .with_color(color);
                    print!("{}", ConsoleFormatter::format_plain(&buffer, style));
                }
                DomainOutputFormat::Json => {
                    let snapshot =
                        LogSnapshot::capture(logger.storage_key(), logger.signal_name(), &buffer);
                    println!("{}", ConsoleFormatter::format_json(&snapshot));
                }
            }
        }
        Command::Session { timestamps } => {
            let style = LineStyle::default()
                .with_numbers(config.output.numbered)
                .with_color(color);
            SessionRepl::new(open_logger(&config)?)
                .with_style(style)
                .with_timestamps(timestamps)
                .run()?;
        }
    }

    Ok(())
}

/// Install the tracing subscriber: stderr always, plus a file when requested.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file needs a file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(Some(guard))
}

/// Build the store and the logger described by `config`.
fn open_logger(config: &FileConfig) -> Result<Logger> {
    let store = open_store(&config.storage_settings()).context("Failed to open store")?;
    let logger = Logger::open(store, config.sink_config());
    debug!(?logger, "Logger ready");
    Ok(logger)
}

/// Command-line flags win over every config source.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(origin) = &cli.origin {
        config.storage.origin = origin.clone();
    }
    if let Some(key) = &cli.key {
        config.storage.key = key.clone();
    }
    if cli.memory {
        config.storage.backend = "memory".to_string();
    }
}

/// Append each argument; `-` streams lines from stdin.
fn emit_lines(logger: &Logger, lines: &[String]) -> Result<()> {
    for line in lines {
        if line == "-" {
            for input in std::io::stdin().lock().lines() {
                let input = input.context("Failed to read stdin")?;
                logger.try_emit(&input)?;
            }
        } else {
            logger.try_emit(line)?;
        }
    }
    Ok(())
}

fn print_config(config: &FileConfig, explicit: Option<&Path>, no_config: bool) -> Result<()> {
    println!("Configuration sources (in priority order):");
    if no_config {
        println!("  [     ] all files disabled by --no-config");
    } else {
        for source in ConfigLoader::config_sources(explicit) {
            let mark = if source.found { "FOUND" } else { "     " };
            println!(
                "  [{}] {:<8} {}",
                mark,
                format!("{}:", source.kind.label()),
                source.location
            );
        }
    }
    println!();
    println!("Effective configuration:");
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
