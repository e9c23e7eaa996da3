// src/gedcom/writer.rs
//! Serializes a graph back to GEDCOM 5.5 text.

use super::tokenizer::MAX_LINE_LEN;
use super::Xref;
use crate::graph::{Graph, Submitter};

/// Identifier of the single submitter record every written file carries.
const SUBMITTER_ID: &str = "SUBM1";

/// Renders `graph` as a complete file, with `submitter` as the header submitter.
#[must_use]
pub fn render(graph: &Graph, submitter: &Submitter) -> String {
    let header = graph.header();
    let subm = Xref::new(SUBMITTER_ID);
    let mut out = LineWriter::default();

    out.line(0, None, "HEAD", "");
    out.line(1, None, "SOUR", &header.source);
    out.line(1, None, "GEDC", "");
    out.line(2, None, "VERS", &header.version);
    out.line(2, None, "FORM", "LINEAGE-LINKED");
    out.line(1, None, "CHAR", header.encoding.as_str());
    out.line(1, None, "SUBM", &subm.to_string());

    out.line(0, Some(&subm), "SUBM", "");
    out.line(1, None, "NAME", &submitter.name);
    if !submitter.address.is_empty() {
        out.line(1, None, "ADDR", &submitter.address);
    }

    for person in graph.individuals() {
        out.line(0, Some(&person.id), "INDI", "");
        let name = format!("{} /{}/", person.given_name, person.surname);
        out.line(1, None, "NAME", name.trim_start());
        if let Some(sex) = person.sex {
            out.line(1, None, "SEX", sex.as_tag());
        }
        if let Some(family) = &person.child_of {
            out.line(1, None, "FAMC", &family.to_string());
        }
        for family in &person.spouse_of {
            out.line(1, None, "FAMS", &family.to_string());
        }
    }

    for family in graph.families() {
        out.line(0, Some(&family.id), "FAM", "");
        if let Some(husband) = &family.husband {
            out.line(1, None, "HUSB", &husband.to_string());
        }
        if let Some(wife) = &family.wife {
            out.line(1, None, "WIFE", &wife.to_string());
        }
        for child in &family.children {
            out.line(1, None, "CHIL", &child.to_string());
        }
    }

    out.line(0, None, "TRLR", "");
    out.finish()
}

/// Emits physical lines, continuing long or multi-line values with `CONT`/`CONC`.
#[derive(Default)]
struct LineWriter {
    buf: String,
}

impl LineWriter {
    fn line(&mut self, level: usize, xref: Option<&Xref>, tag: &str, value: &str) {
        let segments = value.split("\r\n").flat_map(|s| s.split(['\r', '\n']));
        for (idx, segment) in segments.enumerate() {
            let (level, xref, tag) = if idx == 0 {
                (level, xref, tag)
            } else {
                (level + 1, None, "CONT")
            };
            self.physical(level, xref, tag, segment, level + usize::from(idx == 0));
        }
    }

    /// Writes one segment, splitting it with `CONC` at `conc_level` when too long.
    fn physical(
        &mut self,
        level: usize,
        xref: Option<&Xref>,
        tag: &str,
        value: &str,
        conc_level: usize,
    ) {
        let mut rest = value;
        let mut head = Some((level, xref, tag));
        loop {
            let (lvl, xref, tag) = head.take().unwrap_or((conc_level, None, "CONC"));
            let prefix = match xref {
                Some(x) => format!("{lvl} {x} {tag}"),
                None => format!("{lvl} {tag}"),
            };
            let room = MAX_LINE_LEN.saturating_sub(prefix.chars().count() + 1).max(1);
            let split = rest
                .char_indices()
                .nth(room)
                .map_or(rest.len(), |(byte, _)| byte);
            let (chunk, tail) = rest.split_at(split);

            self.buf.push_str(&prefix);
            if !chunk.is_empty() {
                self.buf.push(' ');
                self.buf.push_str(chunk);
            }
            self.buf.push('\n');

            if tail.is_empty() {
                return;
            }
            rest = tail;
        }
    }

    fn finish(self) -> String {
        self.buf
    }
}
