// tests/integration_config.rs
use anyhow::Result;
use pedigree_core::config::Config;
use pedigree_core::graph::Encoding;
use pedigree_core::store::Library;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_header_defaults_seed_new_files() -> Result<()> {
    let dir = TempDir::new()?;
    let config = Config::parse_toml(
        "[header]\nsource = \"family-archive\"\nencoding = \"UTF-8\"\n",
    )?;
    let library = Library::from_config(config);
    let path = dir.path().join("new.ged");

    library.create_file(&path, "Ann", "1 Road")?;
    let summary = library.file_summary(&path)?;
    assert_eq!(summary.source, "family-archive");
    assert_eq!(summary.version, "5.5");
    assert_eq!(summary.encoding, Encoding::Utf8);
    Ok(())
}

#[test]
fn test_extension_controls_filter() -> Result<()> {
    let dir = TempDir::new()?;
    let library = Library::from_config(Config::parse_toml("[library]\nextension = \"gedcom\"\n")?);
    library.create_file(&dir.path().join("a.gedcom"), "Ann", "")?;
    library.create_file(&dir.path().join("b.ged"), "Ann", "")?;

    let accepted = library.filter_files(dir.path())?;
    assert_eq!(accepted, vec![dir.path().join("a.gedcom")]);
    Ok(())
}

#[test]
fn test_events_log_from_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let log = dir.path().join("audit").join("events.jsonl");
    let config_path = dir.path().join("pedigree.toml");
    fs::write(
        &config_path,
        format!("[library]\nevents_log = {:?}\n", log.display().to_string()),
    )?;

    let library = Library::from_config(Config::load_from(&config_path)?);
    let file = dir.path().join("t.ged");
    library.create_file(&file, "Ann", "")?;
    library.add_individual(&file, "Alice", "Smith")?;

    let lines = fs::read_to_string(&log)?;
    assert_eq!(lines.lines().count(), 2);
    assert!(lines.contains("\"id\":\"I1\""));
    Ok(())
}
