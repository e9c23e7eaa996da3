// src/graph/builder.rs
//! Builds the family graph from validated records.
//!
//! Links may be declared from either side (`FAMC`/`FAMS` on the individual,
//! `CHIL`/`HUSB`/`WIFE` on the family). Both directions are unioned so the
//! resulting graph always agrees with itself.

use super::cycles;
use super::types::{Encoding, Family, FileHeader, Individual, Sex, Submitter};
use super::Graph;
use crate::error::Result;
use crate::gedcom::validator::{header_version, submitter_record};
use crate::gedcom::{Record, Xref};
use std::collections::{HashMap, HashSet};

/// Turns validated records into a [`Graph`].
///
/// # Errors
/// Returns `GedcomError::Cycle` if parent-of links loop back on themselves.
pub fn build(records: &[Record]) -> Result<Graph> {
    let mut individuals = Vec::new();
    let mut families = Vec::new();
    let mut links = HashMap::new();

    for (record, body) in blocks(records) {
        let Some(id) = record.xref.clone() else {
            continue;
        };
        match record.tag.as_str() {
            "INDI" => {
                let (individual, declared) = read_individual(id, body);
                links.insert(individual.id.clone(), declared);
                individuals.push(individual);
            }
            "FAM" => families.push(read_family(id, body)),
            _ => {}
        }
    }

    let header = read_header(records);
    reconcile_children(&mut individuals, &mut families, &links);
    reconcile_spouses(&mut individuals, &mut families, &links);

    let graph = Graph::from_parts(header, individuals, families);
    log::debug!(
        "built graph: {} individuals, {} families",
        graph.header().individual_count,
        graph.header().family_count
    );
    cycles::check(&graph)?;
    Ok(graph)
}

/// Family links as the individual record declares them.
#[derive(Debug, Default)]
struct DeclaredLinks {
    famc: Vec<Xref>,
    fams: Vec<Xref>,
}

/// Top-level records paired with their sub-records.
fn blocks(records: &[Record]) -> impl Iterator<Item = (&Record, &[Record])> {
    let starts: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.level == 0)
        .map(|(idx, _)| idx)
        .collect();
    let ends: Vec<usize> = starts
        .iter()
        .skip(1)
        .copied()
        .chain(std::iter::once(records.len()))
        .collect();
    starts
        .into_iter()
        .zip(ends)
        .map(move |(start, end)| (&records[start], &records[start + 1..end]))
}

fn read_header(records: &[Record]) -> FileHeader {
    let head = blocks(records)
        .find(|(r, _)| r.tag == "HEAD")
        .map_or(&[][..], |(_, body)| body);

    let first_value = |tag: &str| {
        head.iter()
            .find(|r| r.is(1, tag))
            .map(|r| r.value_str().trim().to_string())
    };

    let source = first_value("SOUR").unwrap_or_default();
    let version = header_version(head).unwrap_or_default().to_string();
    let encoding = first_value("CHAR")
        .and_then(|v| v.parse::<Encoding>().ok())
        .unwrap_or_default();

    let submitter = head
        .iter()
        .find(|r| r.is(1, "SUBM"))
        .and_then(Record::pointer)
        .and_then(|xref| submitter_record(records, &xref))
        .map(|(_, body)| read_submitter(body))
        .unwrap_or_default();

    FileHeader::new(source, version, encoding, submitter)
}

fn read_submitter(body: &[Record]) -> Submitter {
    let field = |tag: &str| {
        body.iter()
            .find(|r| r.is(1, tag))
            .map(|r| r.value_str().trim().to_string())
            .unwrap_or_default()
    };
    Submitter::new(field("NAME"), field("ADDR"))
}

fn read_individual(id: Xref, body: &[Record]) -> (Individual, DeclaredLinks) {
    let mut individual = Individual::new(id, "", "");
    let mut links = DeclaredLinks::default();
    let mut named = false;

    for (idx, record) in body.iter().enumerate() {
        if record.level != 1 {
            continue;
        }
        match record.tag.as_str() {
            "NAME" if !named => {
                named = true;
                let parts = sub_records(&body[idx + 1..]);
                let (given, surname) = parse_name(record.value_str(), parts);
                individual.given_name = given;
                individual.surname = surname;
            }
            "SEX" => individual.sex = Some(Sex::from_tag(record.value_str())),
            "FAMC" => links.famc.extend(record.pointer()),
            "FAMS" => links.fams.extend(record.pointer()),
            _ => {}
        }
    }
    (individual, links)
}

fn read_family(id: Xref, body: &[Record]) -> Family {
    let mut family = Family::new(id);
    for record in body.iter().filter(|r| r.level == 1) {
        let Some(pointer) = record.pointer() else {
            continue;
        };
        match record.tag.as_str() {
            "HUSB" if family.husband.is_none() => family.husband = Some(pointer),
            "WIFE" if family.wife.is_none() => family.wife = Some(pointer),
            "CHIL" if !family.children.contains(&pointer) => family.children.push(pointer),
            "HUSB" | "WIFE" => log::warn!(
                "{}: extra {} {} ignored",
                family.id,
                record.tag,
                pointer
            ),
            _ => {}
        }
    }
    family
}

/// Records nested below the record preceding `rest`.
fn sub_records(rest: &[Record]) -> &[Record] {
    let end = rest.iter().position(|r| r.level <= 1).unwrap_or(rest.len());
    &rest[..end]
}

/// Splits `Given /Surname/`, falling back to `GIVN`/`SURN` for missing parts.
fn parse_name(value: &str, parts: &[Record]) -> (String, String) {
    let (mut given, mut surname) = match value.split_once('/') {
        Some((given, rest)) => {
            let surname = rest.split_once('/').map_or(rest, |(s, _)| s);
            (given.trim().to_string(), surname.trim().to_string())
        }
        None => (value.trim().to_string(), String::new()),
    };

    let part = |tag: &str| {
        parts
            .iter()
            .find(|r| r.is(2, tag))
            .map(|r| r.value_str().trim().to_string())
            .filter(|v| !v.is_empty())
    };
    if given.is_empty() {
        given = part("GIVN").unwrap_or_default();
    }
    if surname.is_empty() {
        surname = part("SURN").unwrap_or_default();
    }
    (given, surname)
}

/// Settles one `child_of` per individual and rebuilds family child lists to match.
fn reconcile_children(
    individuals: &mut [Individual],
    families: &mut [Family],
    links: &HashMap<Xref, DeclaredLinks>,
) {
    let mut first_listing: HashMap<Xref, Xref> = HashMap::new();
    for family in families.iter() {
        for child in &family.children {
            first_listing
                .entry(child.clone())
                .or_insert_with(|| family.id.clone());
        }
    }

    for individual in individuals.iter_mut() {
        let declared = links.get(&individual.id).map_or(&[][..], |l| &l.famc[..]);
        if let Some((first, rest)) = declared.split_first() {
            individual.child_of = Some(first.clone());
            for extra in rest {
                log::warn!(
                    "{}: extra FAMC {} ignored, keeping {}",
                    individual.id,
                    extra,
                    first
                );
            }
        } else {
            individual.child_of = first_listing.remove(&individual.id);
        }
    }

    // Claimants per family, in declaration order.
    let mut claimants: HashMap<&Xref, Vec<&Xref>> = HashMap::new();
    for individual in individuals.iter() {
        if let Some(family) = &individual.child_of {
            claimants.entry(family).or_default().push(&individual.id);
        }
    }

    for family in families.iter_mut() {
        let claimed = claimants.remove(&family.id).unwrap_or_default();
        let members: HashSet<&Xref> = claimed.iter().copied().collect();

        let listed = std::mem::take(&mut family.children);
        let mut seen = HashSet::new();
        for child in listed {
            if members.contains(&child) {
                seen.insert(child.clone());
                family.children.push(child);
            } else {
                log::warn!("{}: CHIL {} belongs to another family, dropped", family.id, child);
            }
        }
        for child in claimed {
            if !seen.contains(child) {
                family.children.push(child.clone());
            }
        }
    }
}

/// Fills spouse slots from `FAMS` and rebuilds `spouse_of` to match the families.
fn reconcile_spouses(
    individuals: &mut [Individual],
    families: &mut [Family],
    links: &HashMap<Xref, DeclaredLinks>,
) {
    let family_index: HashMap<Xref, usize> = families
        .iter()
        .enumerate()
        .map(|(idx, f)| (f.id.clone(), idx))
        .collect();

    for individual in individuals.iter() {
        let declared = links.get(&individual.id).map_or(&[][..], |l| &l.fams[..]);
        for fam_id in declared {
            let Some(&idx) = family_index.get(fam_id) else {
                continue;
            };
            let Some(family) = families.get_mut(idx) else {
                continue;
            };
            if !family.has_spouse(&individual.id) && !seat_spouse(family, individual) {
                log::warn!(
                    "{}: FAMS {} ignored, both spouse slots are taken",
                    individual.id,
                    fam_id
                );
            }
        }
    }

    // Families each individual is seated in, in family order.
    let mut seated: HashMap<&Xref, Vec<&Xref>> = HashMap::new();
    for family in families.iter() {
        for spouse in family.spouses() {
            seated.entry(spouse).or_default().push(&family.id);
        }
    }

    for individual in individuals.iter_mut() {
        let declared = links.get(&individual.id).map_or(&[][..], |l| &l.fams[..]);
        let actual = seated.remove(&individual.id).unwrap_or_default();
        let is_seated: HashSet<&Xref> = actual.iter().copied().collect();

        let mut spouse_of: Vec<Xref> = Vec::with_capacity(actual.len());
        let mut added = HashSet::new();
        for fam_id in declared.iter().chain(actual) {
            if is_seated.contains(fam_id) && added.insert(fam_id) {
                spouse_of.push(fam_id.clone());
            }
        }
        individual.spouse_of = spouse_of;
    }
}

/// Places `individual` in a free spouse slot, preferring the one matching their sex.
fn seat_spouse(family: &mut Family, individual: &Individual) -> bool {
    let id = Some(individual.id.clone());
    let prefers_wife = individual.sex == Some(Sex::Female);
    let (first, second) = if prefers_wife {
        (&mut family.wife, &mut family.husband)
    } else {
        (&mut family.husband, &mut family.wife)
    };
    if first.is_none() {
        *first = id;
        true
    } else if second.is_none() {
        *second = id;
        true
    } else {
        false
    }
}
