// src/store/mod.rs
//! File-level operations over a directory of GEDCOM files.
//!
//! Reads parse the file fresh and take no lock. Mutations hold the file's lock
//! for the whole read-modify-write and replace the file atomically.

pub mod atomic;
pub mod locks;

pub use atomic::atomic_write;
pub use locks::FileLocks;

use crate::config::Config;
use crate::error::{GedcomError, Result};
use crate::events::{EventKind, EventLogger};
use crate::gedcom::{self, Classification, Xref};
use crate::graph::{query, FileSummary, Generations, Graph, PersonName, Submitter};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct Library {
    config: Config,
    locks: FileLocks,
    events: Option<EventLogger>,
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let events = config.library.events_log.clone().map(EventLogger::new);
        Self {
            config,
            locks: FileLocks::new(),
            events,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise any parse error.
    pub fn load(&self, path: &Path) -> Result<Graph> {
        let bytes = fs::read(path).map_err(|e| GedcomError::io(e, path))?;
        let graph = gedcom::parse_bytes(&bytes)?;
        log::debug!(
            "loaded {}: {} individuals, {} families",
            path.display(),
            graph.header().individual_count,
            graph.header().family_count
        );
        Ok(graph)
    }

    /// Creates a header-only file for the given submitter.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty submitter name, `Io` if the file already
    /// exists or cannot be written.
    pub fn create_file(&self, path: &Path, submitter_name: &str, submitter_address: &str) -> Result<()> {
        if submitter_name.trim().is_empty() {
            return Err(GedcomError::InvalidArgument(
                "submitter name must not be empty".to_string(),
            ));
        }
        let submitter = Submitter::new(submitter_name.trim(), submitter_address.trim());
        let graph = Graph::new(self.config.new_file_header(submitter));

        let result = self.locks.with_lock(path, || {
            if path.exists() {
                let err = io::Error::new(io::ErrorKind::AlreadyExists, "file already exists");
                return Err(GedcomError::io(err, path));
            }
            atomic_write(path, &gedcom::render(&graph, graph.submitter()))
        });

        match &result {
            Ok(()) => {
                log::info!("created {}", path.display());
                self.record(EventKind::FileCreated {
                    path: path.display().to_string(),
                });
            }
            Err(e) => self.record_failure(path, e),
        }
        result
    }

    /// OK/rejected verdict for one file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read. Content problems are a rejection, not an error.
    pub fn classify(&self, path: &Path) -> Result<Classification> {
        let bytes = fs::read(path).map_err(|e| GedcomError::io(e, path))?;
        let text = gedcom::tokenizer::decode(&bytes);
        Ok(gedcom::classify_str(&text))
    }

    /// Accepted files directly inside `dir`, sorted by path.
    ///
    /// Only files carrying the configured extension are considered. Files that
    /// cannot be read are skipped with a warning.
    ///
    /// # Errors
    /// `Io` if the directory cannot be listed.
    pub fn filter_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            if entry.file_type().is_file() && self.has_extension(entry.path()) {
                candidates.push(entry.into_path());
            }
        }

        let mut accepted: Vec<PathBuf> = candidates
            .into_par_iter()
            .filter(|path| match self.classify(path) {
                Ok(verdict) => {
                    if let Classification::Rejected(reason) = &verdict {
                        log::debug!("rejected {}: {reason}", path.display());
                    }
                    verdict.is_accepted()
                }
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    false
                }
            })
            .collect();
        accepted.sort();
        Ok(accepted)
    }

    /// Names of all individuals in declaration order.
    ///
    /// # Errors
    /// `Io` or any parse error.
    pub fn individual_listing(&self, path: &Path) -> Result<Vec<PersonName>> {
        Ok(self.load(path)?.individual_listing())
    }

    /// # Errors
    /// `Io` or any parse error.
    pub fn file_summary(&self, path: &Path) -> Result<FileSummary> {
        Ok(self.load(path)?.summary())
    }

    /// Adds an individual to the file and returns the new identifier.
    ///
    /// # Errors
    /// `Io` or any parse error; the file is left untouched on failure.
    pub fn add_individual(&self, path: &Path, given: &str, surname: &str) -> Result<Xref> {
        let id = self.update(path, |graph| graph.add_individual(given, surname))?;
        self.record(EventKind::IndividualAdded {
            path: path.display().to_string(),
            id: id.as_str().to_string(),
        });
        Ok(id)
    }

    /// # Errors
    /// `NotFound`, `InvalidArgument`, `Io` or any parse error.
    pub fn descendants(&self, path: &Path, given: &str, surname: &str, n: i64) -> Result<Generations> {
        query::descendants(&self.load(path)?, given, surname, n)
    }

    /// # Errors
    /// `NotFound`, `InvalidArgument`, `Io` or any parse error.
    pub fn ancestors(&self, path: &Path, given: &str, surname: &str, n: i64) -> Result<Generations> {
        query::ancestors(&self.load(path)?, given, surname, n)
    }

    /// Runs `mutate` on the parsed file under its lock and writes the result back.
    ///
    /// # Errors
    /// Whatever loading, `mutate` or writing returns. Nothing is written on error.
    pub fn update<T>(&self, path: &Path, mutate: impl FnOnce(&mut Graph) -> Result<T>) -> Result<T> {
        let result = self.locks.with_lock(path, || {
            let mut graph = self.load(path)?;
            let value = mutate(&mut graph)?;
            atomic_write(path, &gedcom::render(&graph, graph.submitter()))?;
            Ok(value)
        });
        if let Err(e) = &result {
            self.record_failure(path, e);
        }
        result
    }

    fn has_extension(&self, path: &Path) -> bool {
        let wanted = self.config.library.extension.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }

    fn record(&self, kind: EventKind) {
        if let Some(events) = &self.events {
            events.log(kind);
        }
    }

    fn record_failure(&self, path: &Path, err: &GedcomError) {
        log::warn!("mutation of {} failed: {err}", path.display());
        self.record(EventKind::MutationFailed {
            path: path.display().to_string(),
            error: err.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_create_then_add() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tree.ged");
        let library = Library::new();

        library.create_file(&path, "Ann", "1 Main St")?;
        assert_eq!(library.classify(&path)?, Classification::Accepted);

        let id = library.add_individual(&path, "Alice", "Smith")?;
        assert_eq!(id, Xref::new("I1"));
        let summary = library.file_summary(&path)?;
        assert_eq!(summary.individual_count, 1);
        assert_eq!(summary.submitter_address, "1 Main St");
        Ok(())
    }

    #[test]
    fn test_create_refuses_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tree.ged");
        fs::write(&path, "keep me")?;

        let err = Library::new().create_file(&path, "Ann", "").unwrap_err();
        assert!(matches!(err, GedcomError::Io { .. }));
        assert_eq!(fs::read_to_string(&path)?, "keep me");
        Ok(())
    }

    #[test]
    fn test_create_requires_submitter_name() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("tree.ged");
        let err = Library::new().create_file(&path, "  ", "").unwrap_err();
        assert!(matches!(err, GedcomError::InvalidArgument(_)));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_failed_mutation_leaves_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("broken.ged");
        fs::write(&path, "0 HEAD\n")?;

        assert!(Library::new().add_individual(&path, "A", "B").is_err());
        assert_eq!(fs::read_to_string(&path)?, "0 HEAD\n");
        Ok(())
    }

    #[test]
    fn test_events_are_recorded() -> Result<()> {
        let dir = TempDir::new()?;
        let mut config = Config::default();
        config.library.events_log = Some(dir.path().join("events.jsonl"));
        let library = Library::from_config(config);

        let path = dir.path().join("tree.ged");
        library.create_file(&path, "Ann", "")?;
        library.add_individual(&path, "Alice", "Smith")?;
        let _ = library.create_file(&path, "Ann", "");

        let log = fs::read_to_string(dir.path().join("events.jsonl"))?;
        let kinds: Vec<&str> = log
            .lines()
            .map(|l| {
                ["file_created", "individual_added", "mutation_failed"]
                    .into_iter()
                    .find(|k| l.contains(k))
                    .unwrap_or("?")
            })
            .collect();
        assert_eq!(kinds, ["file_created", "individual_added", "mutation_failed"]);
        Ok(())
    }
}
