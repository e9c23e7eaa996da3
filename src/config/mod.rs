// src/config/mod.rs
pub mod types;

pub use self::types::{Config, HeaderConfig, LibraryConfig};
use crate::graph::{FileHeader, Submitter};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File read by [`Config::load`] from the working directory.
pub const CONFIG_FILE: &str = "pedigree.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `pedigree.toml` from the working directory.
    ///
    /// A missing file yields defaults; an unreadable or invalid one is reported
    /// with a warning and also yields defaults.
    #[must_use]
    pub fn load() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring {CONFIG_FILE}: {e:#}");
                Self::default()
            }
        }
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_toml(&content).with_context(|| format!("Invalid TOML in {}", path.display()))
    }

    /// Parses configuration text; absent keys take their defaults.
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for this schema.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Header for a new file, seeded from `[header]`.
    #[must_use]
    pub fn new_file_header(&self, submitter: Submitter) -> FileHeader {
        FileHeader::new(
            self.header.source.clone(),
            self.header.version.clone(),
            self.header.encoding,
            submitter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Encoding;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.library.extension, "ged");
        assert_eq!(config.library.events_log, None);
        assert_eq!(config.header.source, "genealogy");
        assert_eq!(config.header.version, "5.5");
        assert_eq!(config.header.encoding, Encoding::Ansel);
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let config = Config::parse_toml("[header]\nencoding = \"UTF-8\"\n")?;
        assert_eq!(config.header.encoding, Encoding::Utf8);
        assert_eq!(config.header.source, "genealogy");
        assert_eq!(config.library.extension, "ged");
        Ok(())
    }

    #[test]
    fn test_load_from_reports_errors() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE);
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, "[header]\nencoding = \"EBCDIC\"\n")?;
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid TOML"));

        fs::write(&path, "[library]\nevents_log = \"audit/events.jsonl\"\n")?;
        let config = Config::load_from(&path)?;
        assert_eq!(
            config.library.events_log.as_deref(),
            Some(Path::new("audit/events.jsonl"))
        );
        Ok(())
    }
}
