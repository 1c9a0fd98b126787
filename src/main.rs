mod calendar;
mod cli;
mod commands;
mod config;
mod date;
mod model;
mod month;
mod navigate;
mod preview;
mod storage;
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::{Env, Target};
use std::fs::{self, OpenOptions};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    if let Err(err) = init_logging() {
        eprintln!("logging disabled: {:#}", err);
    }
    let config = storage::load_config(args.config.as_deref())?;
    let date = commands::parse_date_args(&args.date, Local::now().date_naive())?;
    if args.path {
        commands::print_path(&config, date)
    } else if args.show {
        commands::show(&config, date)
    } else {
        commands::tui(&config, date)
    }
}

// The terminal belongs to the UI, so logs go to a file.
fn init_logging() -> Result<()> {
    let path = storage::log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
