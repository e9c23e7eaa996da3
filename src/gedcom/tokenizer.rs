// src/gedcom/tokenizer.rs
//! Line tokenizer for GEDCOM 5.5 text.
//!
//! Turns raw text into a lazy stream of [`Record`]s. Only the line grammar is
//! checked here; structure and references are the validator's job.

use super::types::{Record, Xref};
use crate::error::{GedcomError, Result};
use std::borrow::Cow;

/// Longest physical line GEDCOM 5.5 permits.
pub const MAX_LINE_LEN: usize = 255;

/// Deepest nesting level GEDCOM 5.5 allows.
pub const MAX_LEVEL: usize = 99;

const BOM: char = '\u{feff}';

/// Tags are at most 31 alphanumerics; a leading underscore marks a user tag.
fn is_valid_tag(tag: &str) -> bool {
    tag.len() <= 31 && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Decodes raw file bytes. Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Lazy, single-pass record stream. Stops after the first error.
pub struct Tokenizer<'a> {
    lines: PhysicalLines<'a>,
    pending: Option<Result<Record>>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: PhysicalLines::new(input.strip_prefix(BOM).unwrap_or(input)),
            pending: None,
            failed: false,
        }
    }

    fn read_record(&mut self) -> Option<Result<Record>> {
        loop {
            let (number, text) = self.lines.next()?;
            if text.trim().is_empty() {
                continue;
            }
            return Some(parse_line(number, text));
        }
    }

    fn take_pending(&mut self) -> Option<Result<Record>> {
        self.pending.take().or_else(|| self.read_record())
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut record = match self.take_pending()? {
            Ok(record) => record,
            Err(e) => {
                self.failed = true;
                return Some(Err(e));
            }
        };

        loop {
            match self.read_record() {
                Some(Ok(next)) if is_continuation(&record, &next) => fold(&mut record, next),
                other => {
                    self.pending = other;
                    return Some(Ok(record));
                }
            }
        }
    }
}

fn is_continuation(record: &Record, next: &Record) -> bool {
    next.level == record.level + 1 && (next.tag == "CONT" || next.tag == "CONC")
}

fn fold(record: &mut Record, next: Record) {
    let value = record.value.get_or_insert_with(String::new);
    if next.tag == "CONT" {
        value.push('\n');
    }
    value.push_str(next.value_str());
}

/// Parses one physical line into a record.
///
/// # Errors
/// Returns `GedcomError::Format` if the level, cross-reference or tag is malformed,
/// the level exceeds [`MAX_LEVEL`], or the line exceeds [`MAX_LINE_LEN`].
pub fn parse_line(line: usize, text: &str) -> Result<Record> {
    if text.chars().count() > MAX_LINE_LEN {
        return Err(GedcomError::format(
            line,
            format!("line is longer than {MAX_LINE_LEN} characters"),
        ));
    }

    let (level_word, rest) = split_word(text.trim_start());
    let level = level_word.parse::<usize>().map_err(|_| {
        GedcomError::format(line, format!("level `{level_word}` is not a number"))
    })?;
    if level > MAX_LEVEL {
        return Err(GedcomError::format(
            line,
            format!("level {level} is deeper than {MAX_LEVEL}"),
        ));
    }

    let rest = rest.trim_start();
    let (xref, rest) = if rest.starts_with('@') {
        let (word, tail) = split_word(rest);
        let xref = Xref::from_pointer(word).ok_or_else(|| {
            GedcomError::format(line, format!("malformed cross-reference `{word}`"))
        })?;
        (Some(xref), tail.trim_start())
    } else {
        (None, rest)
    };

    let (tag, tail) = split_word(rest);
    if tag.is_empty() {
        return Err(GedcomError::format(line, "missing tag"));
    }
    if !is_valid_tag(tag) {
        return Err(GedcomError::format(line, format!("invalid tag `{tag}`")));
    }

    // A single delimiter separates tag and value; anything after it is kept verbatim.
    let value = tail
        .strip_prefix([' ', '\t'])
        .unwrap_or(tail)
        .to_string();

    Ok(Record {
        line,
        level,
        xref,
        tag: tag.to_string(),
        value: (!value.is_empty()).then_some(value),
    })
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

/// Splits on `\n`, `\r\n` or a bare `\r`, numbering lines from 1.
struct PhysicalLines<'a> {
    rest: &'a str,
    number: usize,
}

impl<'a> PhysicalLines<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            number: 0,
        }
    }
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        self.number += 1;

        let Some(end) = self.rest.find(['\r', '\n']) else {
            let line = self.rest;
            self.rest = "";
            return Some((self.number, line));
        };

        let line = &self.rest[..end];
        let after = &self.rest[end..];
        self.rest = after
            .strip_prefix("\r\n")
            .or_else(|| after.strip_prefix('\r'))
            .or_else(|| after.strip_prefix('\n'))
            .unwrap_or(after);
        Some((self.number, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn collect(input: &str) -> crate::error::Result<Vec<Record>> {
        Tokenizer::new(input).collect()
    }

    #[test]
    fn test_basic_records() -> Result<()> {
        let records = collect("0 HEAD\n1 SOUR PAF\n0 @I1@ INDI\n1 NAME John /Smith/\n0 TRLR\n")?;
        assert_eq!(records.len(), 5);

        let indi = &records[2];
        assert_eq!(indi.level, 0);
        assert_eq!(indi.xref, Some(Xref::new("I1")));
        assert_eq!(indi.tag, "INDI");
        assert_eq!(indi.value, None);
        assert_eq!(indi.line, 3);

        assert_eq!(records[3].value_str(), "John /Smith/");
        Ok(())
    }

    #[test]
    fn test_line_terminators() -> Result<()> {
        let records = collect("0 HEAD\r\n1 SOUR X\r1 CHAR ASCII\n\n0 TRLR")?;
        let tags: Vec<_> = records.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, ["HEAD", "SOUR", "CHAR", "TRLR"]);
        assert_eq!(records[3].line, 5);
        Ok(())
    }

    #[test]
    fn test_bom_is_stripped() -> Result<()> {
        let records = collect("\u{feff}0 HEAD\n0 TRLR\n")?;
        assert_eq!(records[0].tag, "HEAD");
        Ok(())
    }

    #[test]
    fn test_cont_and_conc_fold() -> Result<()> {
        let input = "0 @S1@ SUBM\n1 ADDR 12 Main St\n2 CONT Spring\n2 CONC field\n1 NAME X\n";
        let records = collect(input)?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].value_str(), "12 Main St\nSpringfield");
        assert_eq!(records[2].tag, "NAME");

        let conc = collect("1 NOTE abc\n2 CONC def\n")?;
        assert_eq!(conc[0].value_str(), "abcdef");
        Ok(())
    }

    #[test]
    fn test_non_numeric_level() {
        let err = collect("0 HEAD\nX SOUR abc\n").unwrap_err();
        assert!(matches!(err, GedcomError::Format { line: 2, .. }));
    }

    #[test]
    fn test_level_out_of_range() -> Result<()> {
        let err = collect("0 HEAD\n18446744073709551615 NOTE x\n0 TRLR\n").unwrap_err();
        assert!(matches!(err, GedcomError::Format { line: 2, .. }));

        let err = collect("0 HEAD\n100 NOTE x\n").unwrap_err();
        assert!(err.to_string().contains("deeper than 99"));

        let records = collect("0 HEAD\n99 NOTE x\n0 TRLR\n")?;
        assert_eq!(records[1].level, 99);
        Ok(())
    }

    #[test]
    fn test_missing_tag() {
        let err = collect("0 @I1@\n").unwrap_err();
        assert!(matches!(err, GedcomError::Format { line: 1, .. }));
        assert!(err.to_string().contains("missing tag"));
    }

    #[test]
    fn test_unclosed_xref() {
        let err = collect("0 @I1 INDI\n").unwrap_err();
        assert!(err.to_string().contains("malformed cross-reference"));
    }

    #[test]
    fn test_overlong_line() {
        let input = format!("1 NOTE {}\n", "x".repeat(MAX_LINE_LEN));
        assert!(collect(&input).is_err());
    }

    #[test]
    fn test_stops_after_error() {
        let mut tokens = Tokenizer::new("0 HEAD\nbad\n0 TRLR\n");
        assert!(matches!(tokens.next(), Some(Ok(_))));
        assert!(matches!(tokens.next(), Some(Err(_))));
        assert!(tokens.next().is_none());
    }
}
