// src/cli/display.rs
//! Terminal and JSON rendering of command results.

use crate::gedcom::Classification;
use crate::graph::{FileSummary, Generations, PersonName};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Prints `value` as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_classification(path: &Path, verdict: &Classification) {
    match verdict {
        Classification::Accepted => {
            println!("{} {}", "[OK]".green().bold(), path.display());
        }
        Classification::Rejected(reason) => {
            println!("{} {}", "[REJECTED]".red().bold(), path.display());
            println!("  {reason}");
        }
    }
}

pub fn print_paths(paths: &[PathBuf]) {
    if paths.is_empty() {
        println!("{}", "No valid files found.".dimmed());
        return;
    }
    for path in paths {
        println!("{}", path.display());
    }
}

pub fn print_listing(people: &[PersonName]) {
    if people.is_empty() {
        println!("{}", "No individuals.".dimmed());
        return;
    }
    for (idx, person) in people.iter().enumerate() {
        println!("{:>4}  {}", (idx + 1).to_string().dimmed(), person);
    }
}

pub fn print_summary(summary: &FileSummary) {
    let rows = [
        ("Source", summary.source.clone()),
        ("Version", summary.version.clone()),
        ("Encoding", summary.encoding.to_string()),
        ("Submitter", summary.submitter_name.clone()),
        ("Address", summary.submitter_address.replace('\n', ", ")),
        ("Individuals", summary.individual_count.to_string()),
        ("Families", summary.family_count.to_string()),
    ];
    for (label, value) in rows {
        println!("{:<12} {}", format!("{label}:").bold(), value);
    }
}

pub fn print_generations(generations: &Generations) {
    if generations.is_empty() {
        println!("{}", "No generations requested.".dimmed());
        return;
    }
    for (idx, generation) in generations.iter().enumerate() {
        let names = if generation.is_empty() {
            "-".dimmed().to_string()
        } else {
            generation
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("{} {}", format!("Generation {}:", idx + 1).cyan(), names);
    }
}
