//! Command-line arguments

use clap::{Parser, Subcommand};
use curriculum_core::{AppConfig, StoreLocation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "curriculum-mapper", version)]
#[command(about = "Map course content to industry standards and job requirements", long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides CURRICULUM_DB)
    #[arg(long, global = true, conflicts_with = "in_memory")]
    pub db: Option<PathBuf>,
    /// Keep all entities in memory for this run
    #[arg(long, global = true)]
    pub in_memory: bool,
    /// YAML dataset to seed instead of the built-in sample
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print coverage per course and suggested curriculum additions (default)
    Report {
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the skills each standard or requirement is missing
    Gaps,
    /// Print the most demanded skills across job postings
    Trends {
        /// Number of skills to list (overrides CURRICULUM_TREND_LIMIT)
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

impl Cli {
    /// The subcommand to run; a bare invocation is a text report
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Report { json: false })
    }

    /// Applies store flags on top of the environment configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if self.in_memory {
            config.store = StoreLocation::InMemory;
        } else if let Some(db) = &self.db {
            config.store = StoreLocation::File(db.clone());
        }
    }
}
