// src/bin/pedigree.rs
use clap::Parser;
use colored::Colorize;

use pedigree_core::cli::{dispatch, Cli};
use pedigree_core::config::Config;
use pedigree_core::exit::PedigreeExit;
use pedigree_core::store::Library;

fn main() -> PedigreeExit {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let library = Library::from_config(Config::load());

    match dispatch::execute(&cli, &library) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            PedigreeExit::for_error(&e)
        }
    }
}
