//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The log text as stored
    Plain,
    /// JSON snapshot with lines and metadata
    Json,
}

impl From<OutputFormat> for outlog_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Plain => outlog_domain::OutputFormat::Plain,
            OutputFormat::Json => outlog_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for outlog
#[derive(Parser, Debug)]
#[command(name = "outlog")]
#[command(author, version, about = "Append-only diagnostic log with change notifications")]
#[command(long_about = r#"
outlog keeps one accumulated text log in a per-origin key-value store.
Every emitted line is appended with a trailing newline; the log only
shrinks when it is cleared.

Configuration files are loaded from (in priority order):
1. OUTLOG_<SECTION>__<KEY>          Environment variables
2. --config <path>                  Explicit config file
3. ./outlog.toml                    Project-level config
4. ~/.config/outlog/config.toml     Global config

Example:
  outlog emit "build started"
  printf 'a\nb\n' | outlog emit -
  outlog show --numbered
  outlog clear
  outlog session --timestamps
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Origin whose store is used (overrides config)
    #[arg(long, global = true, value_name = "NAME")]
    pub origin: Option<String>,

    /// Storage key holding the log (overrides config)
    #[arg(long, global = true, value_name = "KEY")]
    pub key: Option<String>,

    /// Use a throwaway in-memory store
    #[arg(long, global = true)]
    pub memory: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write diagnostics to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append lines to the log ("-" reads lines from stdin)
    Emit {
        #[arg(required = true, value_name = "LINE")]
        lines: Vec<String>,
    },

    /// Reset the log to empty
    Clear,

    /// Print the log
    Show {
        /// Output format (defaults to config, then plain)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Prefix lines with their number
        #[arg(short, long)]
        numbered: bool,
    },

    /// Interactive session: every typed line is emitted
    Session {
        /// Prefix emitted lines with the local time
        #[arg(short, long)]
        timestamps: bool,
    },

    /// Show configuration sources and effective values
    Config,
}
