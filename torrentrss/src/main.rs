use std::path::PathBuf;

use anyhow::{Context, Result};
use check::{CheckSummary, Checker};
use clap::Parser;
use command::SystemOpener;
use config::{Config, DEFAULT_CONFIG_PATH, EXAMPLE_CONFIG};
use log::LevelFilter;

mod check;
mod command;
mod config;
mod error;
mod feed;
mod notify;
mod subscription;

/// Checks torrent RSS feeds and launches new episodes
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Config file, defaults to $TORRENTRSS_CONFIG or config.yml
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Increases log level
    #[clap(short, long)]
    verbose: bool,

    /// Prints an example config and exits
    #[clap(long)]
    print_example_config: bool,

    /// Logs matches without downloading, launching or saving anything
    #[clap(long)]
    dry_run: bool,
}

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_env(
            env_logger::Env::default().default_filter_or(if args.verbose {
                "debug"
            } else {
                "info"
            }),
        )
        .init();

    if args.print_example_config {
        print!("{}", EXAMPLE_CONFIG);
        return;
    }

    match run(&args).await {
        Ok(summary) if summary.failures == 0 => {}
        Ok(summary) => {
            error!("{} failures while checking feeds", summary.failures);
            notify::show_error_notification(
                summary.failure_kind.unwrap_or(error::GENERIC_ERROR_KIND),
            );
            std::process::exit(2);
        }
        Err(e) => {
            error!("{:?}", e);
            notify::show_error_notification(error::error_kind(&e));
            std::process::exit(2);
        }
    }
}

async fn run(args: &Args) -> Result<CheckSummary> {
    let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH.as_path());
    let mut config = Config::load(path)?;
    let mut checker = Checker::new(&config.file, Box::new(SystemOpener))
        .with_context(|| format!("invalid config {}", path.display()))?;
    if checker.feeds().is_empty() {
        warn!("no feeds in {}", path.display());
    }

    info!("checking feeds from {}", config.path().display());
    let summary = checker.check_feeds(args.dry_run).await;
    if args.dry_run {
        info!("dry run: not saving episode numbers");
        return Ok(summary);
    }
    config.update_episode_numbers(checker.episode_numbers());
    config.save()?;
    Ok(summary)
}
