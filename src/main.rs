mod app;
mod cache;
mod commands;
mod config;
mod controllers;
mod event;
mod logging;
mod pokeapi;
mod query;
mod task;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dexterm")]
#[command(about = "A terminal Pokédex backed by a caching PokéAPI client")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./dexterm.yaml or $XDG_CONFIG_HOME/dexterm/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Write logs to this file instead of the daily log in the data directory
  #[arg(long)]
  log_file: Option<PathBuf>,

  /// Number of pokemon fetched per page
  #[arg(short, long)]
  page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Keep the guard alive so buffered log lines are flushed on exit
  let _log_guard = logging::init(args.log_file.as_deref())?;

  let config = config::Config::load(args.config.as_deref())?;

  let mut app = app::App::new(config, args.page_size)?;
  app.run().await?;

  Ok(())
}
