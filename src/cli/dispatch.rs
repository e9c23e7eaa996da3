// src/cli/dispatch.rs
//! Routes parsed commands to their handlers.

use super::args::{Cli, Commands};
use super::handlers::{self, Direction};
use crate::exit::PedigreeExit;
use crate::store::Library;
use anyhow::Result;

/// Executes the parsed command against `library`.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(cli: &Cli, library: &Library) -> Result<PedigreeExit> {
    let json = cli.json;
    match &cli.command {
        Commands::Create {
            file,
            name,
            address,
        } => handlers::handle_create(library, file, name, address, json),
        Commands::Check { file } => handlers::handle_check(library, file, json),
        Commands::Filter { dir } => handlers::handle_filter(library, dir, json),
        Commands::List { file } => handlers::handle_list(library, file, json),
        Commands::Summary { file } => handlers::handle_summary(library, file, json),
        Commands::Add {
            file,
            given,
            surname,
        } => handlers::handle_add(library, file, given, surname, json),
        Commands::Descendants { query } => {
            handlers::handle_query(library, Direction::Descendants, query, json)
        }
        Commands::Ancestors { query } => {
            handlers::handle_query(library, Direction::Ancestors, query, json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn run(args: &[&str], library: &Library) -> Result<PedigreeExit> {
        let cli = Cli::try_parse_from(std::iter::once("pedigree").chain(args.iter().copied()))?;
        execute(&cli, library)
    }

    #[test]
    fn test_end_to_end_commands() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("tree.ged");
        let file = file.to_str().unwrap_or_default();
        let library = Library::new();

        assert_eq!(run(&["create", file, "--name", "Ann"], &library)?, PedigreeExit::Success);
        assert_eq!(run(&["add", file, "Alice", "Smith"], &library)?, PedigreeExit::Success);
        assert_eq!(run(&["--json", "list", file], &library)?, PedigreeExit::Success);
        assert_eq!(run(&["check", file], &library)?, PedigreeExit::Success);
        assert_eq!(
            run(&["descendants", file, "Alice", "Smith", "-n", "2"], &library)?,
            PedigreeExit::Success
        );
        Ok(())
    }

    #[test]
    fn test_failures_map_to_exit_codes() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("tree.ged");
        std::fs::write(&file, "0 HEAD\n")?;
        let file = file.to_str().unwrap_or_default();
        let library = Library::new();

        assert_eq!(run(&["check", file], &library)?, PedigreeExit::InvalidInput);
        let err = run(&["list", file], &library).unwrap_err();
        assert_eq!(PedigreeExit::for_error(&err), PedigreeExit::InvalidInput);
        Ok(())
    }

    #[test]
    fn test_negative_generations_parse() -> Result<()> {
        let cli = Cli::try_parse_from(["pedigree", "ancestors", "t.ged", "A", "B", "-n", "-1"])?;
        match cli.command {
            Commands::Ancestors { query } => assert_eq!(query.generations, -1),
            _ => panic!("wrong command"),
        }
        Ok(())
    }
}
