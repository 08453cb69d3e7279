//! Command line interface
//!
//! Argument parsing and validation, plus the input-list and logging-setup
//! helpers the binary entry point wires together.

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser};
use log::{debug, error, LevelFilter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::ConfigManager;
use crate::logging::{self, LogConfig, LogDestination, LogFormat};

/// Concurrent line counting tool
#[derive(Parser, Debug)]
#[command(name = "lstats")]
#[command(about = "Counts lines across files, classifying each as regular, comment, or blank")]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Files to count
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// A file containing the files you want counted, one path per line
    #[arg(long, value_name = "FILE")]
    pub list: Option<PathBuf>,

    /// Show usage
    #[arg(short, long)]
    pub help: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}

/// Print usage to standard output
pub fn print_usage() {
    let mut command = Args::command();
    if let Err(e) = command.print_help() {
        eprintln!("failed to print usage: {}", e);
    }
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("validating CLI argument combinations");

    let log_flags = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();
    if log_flags > 1 {
        return Err(anyhow!(
            "conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(ref format) = args.log_format {
        format
            .parse::<LogFormat>()
            .map_err(|e| anyhow!(e))?;
    }

    if let Some(ref level) = args.log_file_level {
        logging::parse_log_level(level)?;
        if args.log_file.is_none() {
            return Err(anyhow!("--log-file-level requires --log-file to be specified"));
        }
    }

    Ok(())
}

/// Resolve the effective logging configuration from flags and config file.
///
/// Explicit CLI flags win over `[logging]` values from the configuration.
pub fn resolve_log_config(args: &Args, config: &ConfigManager) -> Result<LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        config
            .get_log_level("logging", "level")?
            .unwrap_or(LevelFilter::Info)
    };

    let format = match &args.log_format {
        Some(format) => format.parse::<LogFormat>().map_err(|e| anyhow!(e))?,
        None => match config.get_value("logging", "format") {
            Some(format) => format.parse::<LogFormat>().map_err(|e| anyhow!(e))?,
            None => LogFormat::Text,
        },
    };

    let log_file = args
        .log_file
        .clone()
        .or_else(|| config.get_path("logging", "file"));
    let file_level = match &args.log_file_level {
        Some(level) => Some(logging::parse_log_level(level)?),
        None => log_file.as_ref().map(|_| console_level),
    };

    let destination = match log_file {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Console,
    };

    Ok(LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Read input paths from a list file, one per line.
///
/// Lines are whitespace-trimmed; blank lines pass through as empty-string
/// paths. A list file that cannot be opened contributes zero paths and the
/// failure is only logged.
pub fn read_list_file(path: &Path) -> Vec<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            error!("open list file ({}) failed: {}", path.display(), err);
            return Vec::new();
        }
    };

    let mut paths = Vec::new();
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => paths.push(line.trim().to_string()),
            Err(err) => {
                error!("read list file ({}) failed: {}", path.display(), err);
                break;
            }
        }
    }
    debug!("{} paths read from list file {}", paths.len(), path.display());
    paths
}
