mod cli;
mod commands;

use anyhow::Result;
use imaging_areas::Config;
use log::LevelFilter;

use cli::{Cli, Commands};
use commands::{footprints, hierarchy, merge_aoi};

/// Map `-v` counts to a level; `RUST_LOG` still takes precedence.
fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Settings from `--config`, or the defaults.
pub(crate) fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::from_json_file(path),
        None => Ok(Config::default()),
    }
}

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logger(cli.verbose);

    match &cli.command {
        Commands::Footprints(args) => footprints::run(&cli, args),
        Commands::Hierarchy(args) => hierarchy::run(&cli, args),
        Commands::MergeAoi(args) => merge_aoi::run(&cli, args),
    }
}

fn main() -> Result<()> { run() }
