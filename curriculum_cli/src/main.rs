//! Curriculum Mapper CLI
//!
//! Seeds the entity store, then prints coverage, gaps or market trends.

use anyhow::{Context, Result};
use clap::Parser;
use curriculum_cli::{run, Cli};
use curriculum_core::AppConfig;

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;
    print!("{}", run(&cli, config)?);
    Ok(())
}
