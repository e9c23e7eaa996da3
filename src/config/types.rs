// src/config/types.rs
use crate::graph::{Encoding, DEFAULT_SOURCE, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub header: HeaderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Extension (without the dot) of files `filter_files` considers.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// JSONL audit trail of mutations. No trail when unset.
    #[serde(default)]
    pub events_log: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            events_log: None,
        }
    }
}

/// Header values written into newly created files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub encoding: Encoding,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            version: default_version(),
            encoding: Encoding::default(),
        }
    }
}

fn default_extension() -> String { "ged".to_string() }
fn default_source() -> String { DEFAULT_SOURCE.to_string() }
fn default_version() -> String { DEFAULT_VERSION.to_string() }
