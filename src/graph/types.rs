// src/graph/types.rs
use crate::gedcom::Xref;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    #[must_use]
    pub fn from_tag(value: &str) -> Self {
        match value.trim() {
            "M" | "m" => Self::Male,
            "F" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

/// Character sets a GEDCOM 5.5 header may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "ANSEL")]
    Ansel,
    #[serde(rename = "UTF-8")]
    Utf8,
    #[serde(rename = "UNICODE")]
    Unicode,
    #[serde(rename = "ASCII")]
    Ascii,
}

impl Encoding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ansel => "ANSEL",
            Self::Utf8 => "UTF-8",
            Self::Unicode => "UNICODE",
            Self::Ascii => "ASCII",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ANSEL" => Ok(Self::Ansel),
            "UTF-8" | "UTF8" => Ok(Self::Utf8),
            "UNICODE" => Ok(Self::Unicode),
            "ASCII" => Ok(Self::Ascii),
            _ => Err(format!("unsupported encoding: {s}")),
        }
    }
}

/// A (given name, surname) pair as reported by listings and queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_name: String,
    pub surname: String,
}

impl PersonName {
    #[must_use]
    pub fn new(given_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            given_name: given_name.into(),
            surname: surname.into(),
        }
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.given_name.is_empty(), self.surname.is_empty()) {
            (false, false) => write!(f, "{} {}", self.given_name, self.surname),
            (true, false) => f.write_str(&self.surname),
            _ => f.write_str(&self.given_name),
        }
    }
}

/// Ordered generations; index 0 holds generation 1.
pub type Generations = Vec<Vec<PersonName>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub id: Xref,
    pub given_name: String,
    pub surname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    /// Family in which this individual is a child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_of: Option<Xref>,
    /// Families in which this individual is a spouse.
    #[serde(default)]
    pub spouse_of: Vec<Xref>,
}

impl Individual {
    #[must_use]
    pub fn new(id: Xref, given_name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id,
            given_name: given_name.into(),
            surname: surname.into(),
            sex: None,
            child_of: None,
            spouse_of: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> PersonName {
        PersonName::new(&self.given_name, &self.surname)
    }

    #[must_use]
    pub fn is_named(&self, given_name: &str, surname: &str) -> bool {
        self.given_name == given_name && self.surname == surname
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: Xref,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub husband: Option<Xref>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wife: Option<Xref>,
    #[serde(default)]
    pub children: Vec<Xref>,
}

impl Family {
    #[must_use]
    pub fn new(id: Xref) -> Self {
        Self {
            id,
            husband: None,
            wife: None,
            children: Vec::new(),
        }
    }

    /// Husband first, then wife.
    pub fn spouses(&self) -> impl Iterator<Item = &Xref> {
        self.husband.iter().chain(self.wife.iter())
    }

    #[must_use]
    pub fn has_spouse(&self, id: &Xref) -> bool {
        self.spouses().any(|s| s == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Submitter {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl Submitter {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub source: String,
    pub version: String,
    pub encoding: Encoding,
    pub submitter: Submitter,
    pub individual_count: usize,
    pub family_count: usize,
}

impl FileHeader {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        version: impl Into<String>,
        encoding: Encoding,
        submitter: Submitter,
    ) -> Self {
        Self {
            source: source.into(),
            version: version.into(),
            encoding,
            submitter,
            individual_count: 0,
            family_count: 0,
        }
    }
}

/// Flat header report for the file-summary operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub source: String,
    pub version: String,
    pub encoding: Encoding,
    pub submitter_name: String,
    pub submitter_address: String,
    pub individual_count: usize,
    pub family_count: usize,
}
