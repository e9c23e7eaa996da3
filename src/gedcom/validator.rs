// src/gedcom/validator.rs
//! Structural validation of a tokenized GEDCOM file.
//!
//! Each check reports its earliest violation; the one that appears first in
//! the file wins. Nothing is aggregated.

use super::types::{Record, Xref};
use crate::error::{GedcomError, Result};
use crate::graph::Encoding;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// The rule a file broke, as reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationRule {
    #[error("file does not open with a `0 HEAD` record")]
    MissingHeader,

    #[error("file does not end with a `0 TRLR` record")]
    MissingTrailer,

    #[error("records follow the `0 TRLR` trailer")]
    ContentAfterTrailer,

    #[error("header is missing {0}")]
    MissingHeaderField(HeaderField),

    #[error("unsupported character encoding `{0}`")]
    UnsupportedEncoding(String),

    #[error("level {found} cannot follow level {previous}")]
    LevelSkip { previous: usize, found: usize },

    #[error("identifier {0} is declared more than once")]
    DuplicateIdentifier(String),

    #[error("{tag} value `{value}` is not a pointer")]
    MalformedPointer { tag: String, value: String },

    #[error("{0} does not point to any record")]
    UnresolvedReference(String),

    #[error("{pointer} should point to a {expected} record, found {found}")]
    WrongTarget {
        pointer: String,
        expected: &'static str,
        found: String,
    },
}

/// Mandatory header sub-fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Source,
    Version,
    Encoding,
    Submitter,
    SubmitterName,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Source => "source (1 SOUR)",
            Self::Version => "GEDCOM version (2 VERS)",
            Self::Encoding => "character encoding (1 CHAR)",
            Self::Submitter => "submitter (1 SUBM)",
            Self::SubmitterName => "submitter name (1 NAME)",
        };
        f.write_str(label)
    }
}

/// Binary verdict used when filtering candidate files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Classification {
    Accepted,
    Rejected(String),
}

impl Classification {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// The wire label the file-listing layer expects.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Accepted => "OK",
            Self::Rejected(_) => "REJECTED",
        }
    }
}

/// Link tags and the record kind each must point to.
const LINK_TARGETS: [(&str, &str); 5] = [
    ("FAMC", "FAM"),
    ("FAMS", "FAM"),
    ("HUSB", "INDI"),
    ("WIFE", "INDI"),
    ("CHIL", "INDI"),
];

type Violation = (usize, ValidationRule);

/// Consumes a token stream and checks it.
///
/// # Errors
/// Propagates the first `GedcomError::Format` from the stream, otherwise returns
/// `GedcomError::Validation` for the earliest violated rule.
pub fn validate<I>(tokens: I) -> Result<Vec<Record>>
where
    I: IntoIterator<Item = Result<Record>>,
{
    let records = tokens.into_iter().collect::<Result<Vec<_>>>()?;

    let declared = declarations(&records);
    let checks = [
        check_envelope(&records),
        check_levels(&records),
        check_duplicates(&records),
        check_header(&records, &declared),
        check_references(&records, &declared),
    ];

    let first = checks.into_iter().flatten().min_by_key(|(line, _)| *line);
    match first {
        Some((line, rule)) => Err(GedcomError::validation(line, rule)),
        None => Ok(records),
    }
}

/// Classifies already tokenized input.
#[must_use]
pub fn classify<I>(tokens: I) -> Classification
where
    I: IntoIterator<Item = Result<Record>>,
{
    match validate(tokens) {
        Ok(_) => Classification::Accepted,
        Err(e) => Classification::Rejected(e.to_string()),
    }
}

/// Top-level identifiers mapped to their record tag, first declaration wins.
fn declarations(records: &[Record]) -> HashMap<&Xref, &str> {
    let mut declared = HashMap::new();
    for record in records.iter().filter(|r| r.level == 0) {
        if let Some(xref) = &record.xref {
            declared.entry(xref).or_insert(record.tag.as_str());
        }
    }
    declared
}

fn check_envelope(records: &[Record]) -> Option<Violation> {
    let Some(first) = records.first() else {
        return Some((1, ValidationRule::MissingHeader));
    };
    if !first.is(0, "HEAD") {
        return Some((first.line, ValidationRule::MissingHeader));
    }

    match records.iter().position(|r| r.is(0, "TRLR")) {
        None => {
            let last = records.last().map_or(1, |r| r.line);
            Some((last, ValidationRule::MissingTrailer))
        }
        Some(idx) => records
            .get(idx + 1)
            .map(|after| (after.line, ValidationRule::ContentAfterTrailer)),
    }
}

fn check_levels(records: &[Record]) -> Option<Violation> {
    let mut previous = 0;
    for (idx, record) in records.iter().enumerate() {
        let limit = if idx == 0 { 0 } else { previous + 1 };
        if record.level > limit {
            return Some((
                record.line,
                ValidationRule::LevelSkip {
                    previous,
                    found: record.level,
                },
            ));
        }
        previous = record.level;
    }
    None
}

fn check_duplicates(records: &[Record]) -> Option<Violation> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| r.level == 0)
        .filter_map(|r| r.xref.as_ref().map(|x| (r.line, x)))
        .find(|(_, xref)| !seen.insert(*xref))
        .map(|(line, xref)| (line, ValidationRule::DuplicateIdentifier(xref.to_string())))
}

fn check_header(records: &[Record], declared: &HashMap<&Xref, &str>) -> Option<Violation> {
    let head = records.first().filter(|r| r.is(0, "HEAD"))?;
    let body = &records[1..];
    let end = body.iter().position(|r| r.level == 0).unwrap_or(body.len());
    let header = &body[..end];

    let missing = |field| Some((head.line, ValidationRule::MissingHeaderField(field)));

    if !header.iter().any(|r| r.is(1, "SOUR") && !r.value_str().trim().is_empty()) {
        return missing(HeaderField::Source);
    }
    if header_version(header).is_none() {
        return missing(HeaderField::Version);
    }

    let Some(charset) = header.iter().find(|r| r.is(1, "CHAR")) else {
        return missing(HeaderField::Encoding);
    };
    if charset.value_str().trim().parse::<Encoding>().is_err() {
        let found = charset.value_str().trim().to_string();
        return Some((charset.line, ValidationRule::UnsupportedEncoding(found)));
    }

    let Some(subm) = header.iter().find(|r| r.is(1, "SUBM")) else {
        return missing(HeaderField::Submitter);
    };
    // Unresolved or malformed SUBM pointers are reported by the reference check.
    let xref = subm.pointer()?;
    if declared.get(&xref) != Some(&"SUBM") {
        return None;
    }
    match submitter_name(records, &xref) {
        Some(_) => None,
        None => {
            let line = submitter_record(records, &xref).map_or(subm.line, |(r, _)| r.line);
            Some((line, ValidationRule::MissingHeaderField(HeaderField::SubmitterName)))
        }
    }
}

fn check_references(records: &[Record], declared: &HashMap<&Xref, &str>) -> Option<Violation> {
    let mut owner = "";
    for record in records {
        if record.level == 0 {
            owner = record.tag.as_str();
            continue;
        }

        let expected = link_target(owner, record);
        let Some(pointer) = record.pointer() else {
            if expected.is_some() {
                let rule = ValidationRule::MalformedPointer {
                    tag: record.tag.clone(),
                    value: record.value_str().to_string(),
                };
                return Some((record.line, rule));
            }
            continue;
        };

        let Some(found) = declared.get(&pointer) else {
            return Some((record.line, ValidationRule::UnresolvedReference(pointer.to_string())));
        };
        if let Some(expected) = expected {
            if *found != expected {
                let rule = ValidationRule::WrongTarget {
                    pointer: pointer.to_string(),
                    expected,
                    found: (*found).to_string(),
                };
                return Some((record.line, rule));
            }
        }
    }
    None
}

/// Kind of record a structural link must point to, if `record` is one.
fn link_target(owner: &str, record: &Record) -> Option<&'static str> {
    if record.level != 1 {
        return None;
    }
    match owner {
        "HEAD" if record.tag == "SUBM" => Some("SUBM"),
        "INDI" | "FAM" => LINK_TARGETS
            .iter()
            .find(|(tag, _)| *tag == record.tag)
            .map(|(_, target)| *target),
        _ => None,
    }
}

/// Value of `2 VERS` under `1 GEDC` in the header block.
pub(crate) fn header_version(header: &[Record]) -> Option<&str> {
    let start = header.iter().position(|r| r.is(1, "GEDC"))?;
    header[start + 1..]
        .iter()
        .take_while(|r| r.level > 1)
        .find(|r| r.is(2, "VERS"))
        .map(|r| r.value_str().trim())
        .filter(|v| !v.is_empty())
}

/// The `0 @X@ SUBM` record and its sub-records.
pub(crate) fn submitter_record<'r>(
    records: &'r [Record],
    xref: &Xref,
) -> Option<(&'r Record, &'r [Record])> {
    let start = records
        .iter()
        .position(|r| r.level == 0 && r.tag == "SUBM" && r.xref.as_ref() == Some(xref))?;
    let body = &records[start + 1..];
    let end = body.iter().position(|r| r.level == 0).unwrap_or(body.len());
    Some((&records[start], &body[..end]))
}

fn submitter_name<'r>(records: &'r [Record], xref: &Xref) -> Option<&'r str> {
    let (_, body) = submitter_record(records, xref)?;
    body.iter()
        .find(|r| r.is(1, "NAME"))
        .map(|r| r.value_str().trim())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gedcom::tokenizer::Tokenizer;

    const VALID: &str = "\
0 HEAD
1 SOUR PAF
1 GEDC
2 VERS 5.5
2 FORM LINEAGE-LINKED
1 CHAR ANSEL
1 SUBM @U1@
0 @U1@ SUBM
1 NAME Ann Archivist
0 @I1@ INDI
1 NAME Alice /Smith/
1 FAMS @F1@
0 @I2@ INDI
1 NAME Bob /Smith/
1 FAMC @F1@
0 @F1@ FAM
1 WIFE @I1@
1 CHIL @I2@
0 TRLR
";

    fn rule_of(input: &str) -> (usize, ValidationRule) {
        match validate(Tokenizer::new(input)) {
            Err(GedcomError::Validation { line, rule }) => (line, rule),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_file_passes() {
        let records = validate(Tokenizer::new(VALID)).expect("valid file rejected");
        assert_eq!(records.len(), 19);
        assert!(classify(Tokenizer::new(VALID)).is_accepted());
    }

    #[test]
    fn test_missing_head() {
        let input = VALID.replacen("0 HEAD", "0 NOTE x", 1);
        assert_eq!(rule_of(&input), (1, ValidationRule::MissingHeader));
        assert_eq!(rule_of(""), (1, ValidationRule::MissingHeader));
    }

    #[test]
    fn test_missing_trailer() {
        let input = VALID.replace("0 TRLR\n", "");
        assert_eq!(rule_of(&input).1, ValidationRule::MissingTrailer);
    }

    #[test]
    fn test_content_after_trailer() {
        let input = format!("{VALID}0 @I9@ INDI\n");
        assert_eq!(rule_of(&input), (20, ValidationRule::ContentAfterTrailer));
    }

    #[test]
    fn test_missing_header_fields() {
        let cases = [
            ("1 SOUR PAF\n", HeaderField::Source),
            ("2 VERS 5.5\n", HeaderField::Version),
            ("1 CHAR ANSEL\n", HeaderField::Encoding),
            ("1 SUBM @U1@\n", HeaderField::Submitter),
        ];
        for (line, field) in cases {
            let input = VALID.replacen(line, "", 1);
            assert_eq!(
                rule_of(&input),
                (1, ValidationRule::MissingHeaderField(field)),
                "removed {line:?}"
            );
        }
    }

    #[test]
    fn test_missing_submitter_name() {
        let input = VALID.replacen("1 NAME Ann Archivist\n", "", 1);
        assert_eq!(
            rule_of(&input),
            (8, ValidationRule::MissingHeaderField(HeaderField::SubmitterName))
        );
    }

    #[test]
    fn test_unknown_encoding() {
        let input = VALID.replacen("1 CHAR ANSEL", "1 CHAR EBCDIC", 1);
        assert_eq!(
            rule_of(&input),
            (6, ValidationRule::UnsupportedEncoding("EBCDIC".to_string()))
        );
    }

    #[test]
    fn test_unresolved_reference() {
        let input = VALID.replacen("1 CHIL @I2@", "1 CHIL @I7@", 1);
        assert_eq!(
            rule_of(&input),
            (18, ValidationRule::UnresolvedReference("@I7@".to_string()))
        );
    }

    #[test]
    fn test_first_error_in_file_order_wins() {
        // Dangling FAMS on line 12 comes before the dangling CHIL on line 18.
        let input = VALID
            .replacen("1 FAMS @F1@", "1 FAMS @F9@", 1)
            .replacen("1 CHIL @I2@", "1 CHIL @I7@", 1);
        assert_eq!(
            rule_of(&input),
            (12, ValidationRule::UnresolvedReference("@F9@".to_string()))
        );
    }

    #[test]
    fn test_wrong_target_kind() {
        let input = VALID.replacen("1 FAMC @F1@", "1 FAMC @I1@", 1);
        let (line, rule) = rule_of(&input);
        assert_eq!(line, 15);
        assert!(matches!(rule, ValidationRule::WrongTarget { expected: "FAM", .. }));
    }

    #[test]
    fn test_malformed_pointer() {
        let input = VALID.replacen("1 WIFE @I1@", "1 WIFE I1", 1);
        assert!(matches!(rule_of(&input).1, ValidationRule::MalformedPointer { .. }));
    }

    #[test]
    fn test_duplicate_identifier() {
        let input = VALID.replacen("0 @I2@ INDI", "0 @I1@ INDI", 1);
        let (line, rule) = rule_of(&input);
        assert_eq!(line, 13);
        assert_eq!(rule, ValidationRule::DuplicateIdentifier("@I1@".to_string()));
    }

    #[test]
    fn test_level_skip() {
        let input = VALID.replacen("1 NAME Bob /Smith/", "3 NAME Bob /Smith/", 1);
        assert_eq!(
            rule_of(&input),
            (14, ValidationRule::LevelSkip { previous: 0, found: 3 })
        );
    }

    #[test]
    fn test_format_error_propagates() {
        let input = VALID.replacen("1 NAME Bob /Smith/", "one NAME Bob", 1);
        assert!(matches!(
            validate(Tokenizer::new(&input)),
            Err(GedcomError::Format { line: 14, .. })
        ));
    }

    #[test]
    fn test_classification_labels() {
        assert_eq!(Classification::Accepted.label(), "OK");
        let rejected = classify(Tokenizer::new("0 TRLR\n"));
        assert!(!rejected.is_accepted());
        assert_eq!(rejected.label(), "REJECTED");
    }
}
