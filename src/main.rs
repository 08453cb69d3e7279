use anyhow::Result;
use log::{error, info};
use std::env;
use std::process;

use lstats::cli;
use lstats::config::ConfigManager;
use lstats::logging;
use lstats::scanner::Dispatcher;

fn main() {
    if let Err(e) = run() {
        error!("application error: {}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args();
    if args.help || env::args().len() < 2 {
        cli::print_usage();
        process::exit(1);
    }
    cli::validate_args(&args)?;

    let config = match &args.config_file {
        Some(path) => ConfigManager::load_from_file(path.clone())?,
        None => ConfigManager::load()?,
    };
    logging::init_logger(cli::resolve_log_config(&args, &config)?)?;

    let mut paths = args.files.clone();
    if let Some(list) = &args.list {
        paths.extend(cli::read_list_file(list));
    }
    info!("dispatching {} input files", paths.len());

    let settings = config.scan_settings()?;
    let dispatcher = Dispatcher::new(settings.concurrency_threshold);
    dispatcher.run(paths)?;
    Ok(())
}
