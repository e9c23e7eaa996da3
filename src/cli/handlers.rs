// src/cli/handlers.rs
use super::args::QueryArgs;
use super::display;
use crate::exit::PedigreeExit;
use crate::gedcom::Classification;
use crate::store::Library;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

/// Handles the create command.
///
/// # Errors
/// Returns error if the file exists or cannot be written.
pub fn handle_create(
    library: &Library,
    path: &Path,
    name: &str,
    address: &str,
    json: bool,
) -> Result<PedigreeExit> {
    library
        .create_file(path, name, address)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    if json {
        display::print_json(&json!({ "created": path.display().to_string() }))?;
    } else {
        println!("{} {}", "Created".green().bold(), path.display());
    }
    Ok(PedigreeExit::Success)
}

/// Handles the check command. A rejected file exits with `InvalidInput`.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn handle_check(library: &Library, path: &Path, json: bool) -> Result<PedigreeExit> {
    let verdict = library.classify(path)?;
    if json {
        let reason = match &verdict {
            Classification::Accepted => None,
            Classification::Rejected(reason) => Some(reason.as_str()),
        };
        display::print_json(&json!({
            "file": path.display().to_string(),
            "status": verdict.label(),
            "reason": reason,
        }))?;
    } else {
        display::print_classification(path, &verdict);
    }

    if verdict.is_accepted() {
        Ok(PedigreeExit::Success)
    } else {
        Ok(PedigreeExit::InvalidInput)
    }
}

/// Handles the filter command.
///
/// # Errors
/// Returns error if the directory cannot be listed.
pub fn handle_filter(library: &Library, dir: &Path, json: bool) -> Result<PedigreeExit> {
    let accepted = library.filter_files(dir)?;
    if json {
        display::print_json(&accepted)?;
    } else {
        display::print_paths(&accepted);
    }
    Ok(PedigreeExit::Success)
}

/// Handles the list command.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn handle_list(library: &Library, path: &Path, json: bool) -> Result<PedigreeExit> {
    let people = library.individual_listing(path)?;
    if json {
        display::print_json(&people)?;
    } else {
        display::print_listing(&people);
    }
    Ok(PedigreeExit::Success)
}

/// Handles the summary command.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn handle_summary(library: &Library, path: &Path, json: bool) -> Result<PedigreeExit> {
    let summary = library.file_summary(path)?;
    if json {
        display::print_json(&summary)?;
    } else {
        display::print_summary(&summary);
    }
    Ok(PedigreeExit::Success)
}

/// Handles the add command.
///
/// # Errors
/// Returns error if the file cannot be read, parsed or rewritten.
pub fn handle_add(
    library: &Library,
    path: &Path,
    given: &str,
    surname: &str,
    json: bool,
) -> Result<PedigreeExit> {
    let id = library.add_individual(path, given, surname)?;
    if json {
        display::print_json(&json!({ "id": id }))?;
    } else {
        println!("{} {given} /{surname}/ as {id}", "Added".green().bold());
    }
    Ok(PedigreeExit::Success)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Descendants,
    Ancestors,
}

/// Handles the descendants and ancestors commands.
///
/// # Errors
/// Returns error if the file is unusable, the person is unknown or the
/// generation count is out of range.
pub fn handle_query(
    library: &Library,
    direction: Direction,
    args: &QueryArgs,
    json: bool,
) -> Result<PedigreeExit> {
    let QueryArgs {
        file,
        given,
        surname,
        generations,
    } = args;
    let result = match direction {
        Direction::Descendants => library.descendants(file, given, surname, *generations)?,
        Direction::Ancestors => library.ancestors(file, given, surname, *generations)?,
    };
    if json {
        display::print_json(&result)?;
    } else {
        display::print_generations(&result);
    }
    Ok(PedigreeExit::Success)
}
