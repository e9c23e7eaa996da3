// tests/integration_round_trip.rs
use anyhow::Result;
use pedigree_core::gedcom::{parse_str, render};
use pedigree_core::graph::{Encoding, Sex};
use pedigree_core::store::Library;
use std::fs;
use tempfile::TempDir;

const SMITH: &str = include_str!("fixtures/smith.ged");

#[test]
fn test_parse_render_parse() -> Result<()> {
    let first = parse_str(SMITH)?;
    let text = render(&first, first.submitter());
    let second = parse_str(&text)?;

    assert_eq!(second.individuals(), first.individuals());
    assert_eq!(second.families(), first.families());
    assert_eq!(second.summary(), first.summary());
    // A second pass is byte-stable.
    assert_eq!(render(&second, second.submitter()), text);
    Ok(())
}

#[test]
fn test_header_is_preserved() -> Result<()> {
    let graph = parse_str(SMITH)?;
    let summary = graph.summary();
    assert_eq!(summary.source, "FamilyTreeMaker");
    assert_eq!(summary.version, "5.5");
    assert_eq!(summary.encoding, Encoding::Utf8);
    assert_eq!(summary.submitter_name, "Ann Archivist");
    assert_eq!(summary.submitter_address, "12 Elm Road\nSpringfield");
    assert_eq!(summary.individual_count, 7);
    assert_eq!(summary.family_count, 3);
    Ok(())
}

#[test]
fn test_entities_survive_library_rewrite() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("smith.ged");
    fs::write(&path, SMITH)?;
    let library = Library::new();

    library.add_individual(&path, "Eve", "White")?;
    let graph = library.load(&path)?;
    let clara = graph
        .individuals()
        .iter()
        .find(|p| p.is_named("Clara", "Brown"))
        .expect("Clara survives");
    assert_eq!(clara.sex, Some(Sex::Female));
    assert_eq!(clara.child_of.as_ref().map(|f| f.as_str()), Some("F2"));
    assert_eq!(clara.spouse_of.len(), 1);
    assert_eq!(graph.families()[1].children.len(), 2);
    Ok(())
}

#[test]
fn test_bytes_with_bom_and_crlf() -> Result<()> {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(SMITH.replace('\n', "\r\n").as_bytes());
    let graph = pedigree_core::gedcom::parse_bytes(&bytes)?;
    assert_eq!(graph.individuals().len(), 7);
    Ok(())
}
