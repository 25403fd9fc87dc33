/*!
 * Tests for merging translations into per-language documents
 */

use anyhow::Result;
use std::fs;

use resxai::errors::MergeError;
use resxai::resx::ResxDocument;
use resxai::translation::ResourceMerger;
use crate::common;

/// Test that a missing output document is created from the template
#[test]
fn test_mergeBatch_withoutDocument_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let report = merger.merge_batch("AboutBox", "fr-FR", &[("okButton.Text", "OK (fr)"), ("this.Text", "À propos")])?;

    assert!(report.created);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.path, temp_dir.path().join("AboutBox.fr-FR.resx"));

    let document = ResxDocument::parse(&fs::read_to_string(&report.path)?)?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK (fr)"));
    assert_eq!(document.value_of("this.Text"), Some("À propos"));
    Ok(())
}

/// Test that existing values are never overwritten
#[test]
fn test_mergeBatch_withExistingKey_shouldKeepExistingValue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::write_source_resx(temp_dir.path(), "AboutBox.fr-FR", &[("okButton.Text", "D'accord")])?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let report = merger.merge_batch("AboutBox", "fr-FR", &[("okButton.Text", "OK (fr)"), ("this.Text", "À propos")])?;

    assert!(!report.created);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);
    let document = ResxDocument::parse(&fs::read_to_string(&report.path)?)?;
    assert_eq!(document.value_of("okButton.Text"), Some("D'accord"));
    assert_eq!(document.value_of("this.Text"), Some("À propos"));
    Ok(())
}

/// Test that merging the same data twice leaves the file unchanged
#[test]
fn test_mergeBatch_twice_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");
    let pairs = [("okButton.Text", "OK (de)")];

    let first = merger.merge_batch("AboutBox", "de", &pairs)?;
    let bytes = fs::read(&first.path)?;

    let second = merger.merge_batch("AboutBox", "de", &pairs)?;
    assert!(!second.is_changed());
    assert_eq!(second.skipped, 1);
    assert_eq!(fs::read(&second.path)?, bytes);
    Ok(())
}

/// Test that the first pair for a key wins within one batch
#[test]
fn test_mergeBatch_withRepeatedKey_shouldKeepFirstPair() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let report = merger.merge_batch("Forge", "de", &[("a", "Eins"), ("a", "Zwei")])?;
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 1);

    let document = ResxDocument::parse(&fs::read_to_string(&report.path)?)?;
    assert_eq!(document.value_of("a"), Some("Eins"));
    Ok(())
}

/// Test that a single-entry merge appends to an existing document
#[test]
fn test_merge_shouldAppendSingleEntry() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");
    merger.merge("Forge", "it", "a", "Uno")?;

    let report = merger.merge("Forge", "it", "b", "Due")?;
    assert!(!report.created);
    assert!(report.is_changed());

    let document = ResxDocument::parse(&fs::read_to_string(&report.path)?)?;
    let names: Vec<&str> = document.entries().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    Ok(())
}

/// Test that a corrupt output document is reported and left untouched
#[test]
fn test_mergeBatch_withCorruptDocument_shouldFailWithLoadError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "Forge.de.resx", "<root><data name=\"a\">")?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let result = merger.merge_batch("Forge", "de", &[("b", "Zwei")]);
    assert!(matches!(result, Err(MergeError::Load { .. })));
    assert_eq!(fs::read_to_string(&path)?, "<root><data name=\"a\">");
    Ok(())
}

/// Test that output file names follow the manifest naming
#[test]
fn test_outputFileName_shouldIncludeLanguageCode() {
    let merger = ResourceMerger::new("res", "resx");
    assert_eq!(merger.output_file_name("AboutBox", "sr-Cyrl-BA"), "AboutBox.sr-Cyrl-BA.resx");
}

/// Test that a byte order mark on an existing document survives a merge
#[test]
fn test_merge_withByteOrderMark_shouldKeepIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = format!("\u{feff}{}", common::resx_with_entries(&[("a", "A")]));
    let path = common::create_test_file(temp_dir.path(), "AboutBox.fr-FR.resx", &content)?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let report = merger.merge("AboutBox", "fr-FR", "b", "B")?;
    assert_eq!(report.inserted, 1);

    let written = fs::read_to_string(&path)?;
    assert!(written.starts_with("\u{feff}<?xml"));
    assert_eq!(written.matches('\u{feff}').count(), 1);
    let document = ResxDocument::parse(&written)?;
    assert_eq!(document.value_of("a"), Some("A"));
    assert_eq!(document.value_of("b"), Some("B"));
    Ok(())
}

/// Test that documents created from the template carry no byte order mark
#[test]
fn test_mergeBatch_newDocument_shouldNotAddByteOrderMark() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let merger = ResourceMerger::new(temp_dir.path(), "resx");

    let report = merger.merge_batch("Forge", "de", &[("a", "Eins")])?;
    assert!(!fs::read_to_string(&report.path)?.starts_with('\u{feff}'));
    Ok(())
}
