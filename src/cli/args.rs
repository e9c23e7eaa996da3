// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pedigree", version, about = "GEDCOM 5.5 family tree manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty file with only a header and submitter
    Create {
        file: PathBuf,
        /// Submitter name
        #[arg(long)]
        name: String,
        /// Submitter address
        #[arg(long, default_value = "")]
        address: String,
    },
    /// Validate a file and report OK or the first problem
    Check { file: PathBuf },
    /// List the valid GEDCOM files in a directory
    Filter {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// List every individual in declaration order
    List { file: PathBuf },
    /// Show header metadata and record counts
    Summary { file: PathBuf },
    /// Add an individual with no family links
    Add {
        file: PathBuf,
        given: String,
        surname: String,
    },
    /// Show descendants of an individual, one generation per line
    Descendants {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// Show ancestors of an individual, one generation per line
    Ancestors {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    pub file: PathBuf,
    pub given: String,
    pub surname: String,
    /// Number of generations to report
    #[arg(long, short = 'n', default_value = "1", allow_negative_numbers = true)]
    pub generations: i64,
}
