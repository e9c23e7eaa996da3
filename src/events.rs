// src/events.rs
//! Machine-readable audit trail of file mutations.
//!
//! Events are appended as JSON lines to the path configured under
//! `[library] events_log`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    FileCreated {
        path: String,
    },
    IndividualAdded {
        path: String,
        id: String,
    },
    MutationFailed {
        path: String,
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PedigreeEvent {
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, kind: EventKind) {
        // Best-effort: an unwritable audit log must not fail the mutation.
        match Self::serialize_event(kind) {
            Ok(json) => {
                if let Err(e) = self.append_to_file(&json) {
                    log::warn!("could not append to {}: {e}", self.log_path.display());
                }
            }
            Err(e) => log::warn!("could not serialize event: {e}"),
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = PedigreeEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_appends_json_lines() -> Result<()> {
        let dir = TempDir::new()?;
        let logger = EventLogger::new(dir.path().join("audit").join("events.jsonl"));
        logger.log(EventKind::FileCreated {
            path: "tree.ged".into(),
        });
        logger.log(EventKind::IndividualAdded {
            path: "tree.ged".into(),
            id: "I1".into(),
        });

        let content = fs::read_to_string(logger.path())?;
        let events: Vec<PedigreeEvent> = content
            .lines()
            .map(serde_json::from_str::<PedigreeEvent>)
            .collect::<std::result::Result<_, _>>()?;
        assert_eq!(events.len(), 2);
        assert!(content.contains(r#""individual_added""#));
        assert_eq!(
            events[1].kind,
            EventKind::IndividualAdded {
                path: "tree.ged".into(),
                id: "I1".into()
            }
        );
        Ok(())
    }

    #[test]
    fn test_unwritable_log_is_ignored() -> Result<()> {
        let dir = TempDir::new()?;
        let blocker = dir.path().join("file");
        fs::write(&blocker, "")?;
        // Parent "directory" is a regular file, so creating the log fails.
        let logger = EventLogger::new(blocker.join("events.jsonl"));
        logger.log(EventKind::MutationFailed {
            path: "x".into(),
            error: "boom".into(),
        });
        Ok(())
    }
}
