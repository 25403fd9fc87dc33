/*!
 * End-to-end tests for the localization pipeline
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;

use resxai::app_config::ReconcileMode;
use resxai::app_controller::Controller;
use resxai::errors::TranslationError;
use resxai::manifest::{BuildManifest, CsprojManifest};
use resxai::providers::mock::{MockProvider, MockRequest};
use resxai::resx::ResxDocument;
use resxai::translation::{TextTranslator, TranslationService};
use crate::common::{self, StubTranslator};

const ABOUT_BOX_KEYS: &[&str] = &["okButton.Text", "this.Text"];
const BUTTON_KEYS: &[&str] = &["okButton.Text", "confirmButton.Text"];
const FORGE_KEYS: &[&str] = &["this.ToolsGroup.Label"];

fn read_document(path: &std::path::Path) -> Result<ResxDocument> {
    Ok(ResxDocument::parse(&fs::read_to_string(path)?)?)
}

/// Translator that tags every text with its job position
struct PositionTranslator;

#[async_trait]
impl TextTranslator for PositionTranslator {
    async fn translate_batch(&self, texts: &[String], _language_name: &str) -> Result<Vec<String>, TranslationError> {
        Ok(texts
            .iter()
            .enumerate()
            .map(|(position, text)| format!("{}#{}", text, position))
            .collect())
    }
}

/// Numbered reply that leaves out the last line for German
fn short_german_reply(request: &MockRequest) -> String {
    let mut lines: Vec<String> = MockProvider::numbered_lines(&request.user_prompt)
        .into_iter()
        .map(|(ordinal, text)| format!("{}. {} ({})", ordinal, text, request.target_language))
        .collect();
    if request.target_language == "German" {
        lines.pop();
    }
    lines.join("\n")
}

/// Test that a single language run creates the translated document
#[tokio::test]
async fn test_run_withAboutBoxInFrench_shouldCreateTranslatedDocument() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(dir, &[("French (France)", "fr-FR")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("French (France)", "fr")]);

    let summary = controller.run(&translator, None).await?;

    assert_eq!(summary.languages_translated, 1);
    assert!(summary.languages_failed.is_empty());
    assert_eq!(summary.documents_created, vec!["AboutBox.fr-FR.resx"]);
    assert_eq!(summary.entries_inserted, 2);

    let document = read_document(&dir.join("AboutBox.fr-FR.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK (fr)"));
    assert_eq!(document.value_of("this.Text"), Some("About (fr)"));

    let calls = translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "French (France)");
    assert_eq!(calls[0].1, vec!["OK", "About"]);
    Ok(())
}

/// Test that running twice leaves every document byte-identical
#[tokio::test]
async fn test_run_twice_shouldNotChangeDocuments() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(dir, &[("French (France)", "fr-FR")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("French (France)", "fr")]);

    controller.run(&translator, None).await?;
    let output = dir.join("AboutBox.fr-FR.resx");
    let before = fs::read(&output)?;

    let summary = controller.run(&translator, None).await?;
    assert_eq!(fs::read(&output)?, before);
    assert_eq!(summary.entries_inserted, 0);
    assert_eq!(summary.entries_skipped, 2);
    assert!(summary.documents_created.is_empty());
    assert_eq!(summary.documents_updated, 0);
    Ok(())
}

/// Test that one failing language does not stop the others
#[tokio::test]
async fn test_run_withFailingLanguage_shouldTranslateTheRest() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(
        dir,
        &[("German", "de"), ("French (France)", "fr-FR")],
        &[("AboutBox", ABOUT_BOX_KEYS)],
    );
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("French (France)", "fr")]).failing_for("German");

    let summary = controller.run(&translator, None).await?;

    assert_eq!(summary.languages_failed, vec!["de"]);
    assert_eq!(summary.languages_translated, 1);
    assert!(!dir.join("AboutBox.de.resx").exists());
    assert!(dir.join("AboutBox.fr-FR.resx").exists());
    assert_eq!(translator.calls().len(), 2);
    Ok(())
}

/// Test that a reply with a missing line merges nothing for that language
#[tokio::test]
async fn test_run_withShortReply_shouldSkipLanguageAndTranslateTheRest() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(
        dir,
        &[("German", "de"), ("French (France)", "fr-FR")],
        &[("AboutBox", ABOUT_BOX_KEYS)],
    );
    let mock = MockProvider::working().with_custom_response(short_german_reply);
    let service = TranslationService::with_mock(config.translation.clone(), mock.clone());
    let controller = Controller::with_config(config).without_progress();

    let summary = controller.run(&service, None).await?;

    assert_eq!(mock.request_count(), 2);
    assert_eq!(summary.languages_failed, vec!["de"]);
    assert_eq!(summary.documents_created, vec!["AboutBox.fr-FR.resx"]);
    assert!(!dir.join("AboutBox.de.resx").exists());

    let document = read_document(&dir.join("AboutBox.fr-FR.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK (French (France))"));
    assert_eq!(document.value_of("this.Text"), Some("About (French (France))"));
    Ok(())
}

/// Test that duplicate texts keep distinct translations by default
#[tokio::test]
async fn test_run_withDuplicateTexts_positional_shouldKeepOwnTranslations() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_source_resx(dir, "AboutBox", &[("okButton.Text", "OK"), ("confirmButton.Text", "OK")])?;

    let config = common::test_config(
        dir,
        &[("German", "de")],
        &[("AboutBox", BUTTON_KEYS)],
    );
    let controller = Controller::with_config(config).without_progress();

    controller.run(&PositionTranslator, None).await?;

    let document = read_document(&dir.join("AboutBox.de.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK#0"));
    assert_eq!(document.value_of("confirmButton.Text"), Some("OK#1"));
    Ok(())
}

/// Test that first-occurrence mode shares the first translation among duplicates
#[tokio::test]
async fn test_run_withDuplicateTexts_firstOccurrence_shouldShareTranslation() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_source_resx(dir, "AboutBox", &[("okButton.Text", "OK"), ("confirmButton.Text", "OK")])?;

    let mut config = common::test_config(
        dir,
        &[("German", "de")],
        &[("AboutBox", BUTTON_KEYS)],
    );
    config.reconcile_mode = ReconcileMode::FirstOccurrence;
    let controller = Controller::with_config(config).without_progress();

    controller.run(&PositionTranslator, None).await?;

    let document = read_document(&dir.join("AboutBox.de.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK#0"));
    assert_eq!(document.value_of("confirmButton.Text"), Some("OK#0"));
    Ok(())
}

/// Test that empty source values are neither sent nor written
#[tokio::test]
async fn test_run_withEmptySourceValue_shouldSkipEntry() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_source_resx(dir, "AboutBox", &[("okButton.Text", "OK"), ("this.Text", "")])?;

    let config = common::test_config(dir, &[("German", "de")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("German", "de")]);

    controller.run(&translator, None).await?;

    assert_eq!(translator.calls()[0].1, vec!["OK"]);
    let document = read_document(&dir.join("AboutBox.de.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("OK (de)"));
    assert!(!document.contains_key("this.Text"));
    Ok(())
}

/// Test that a missing source document is skipped while others are translated
#[tokio::test]
async fn test_run_withMissingSourceDocument_shouldSkipIt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(
        dir,
        &[("German", "de")],
        &[("Forge", FORGE_KEYS), ("AboutBox", ABOUT_BOX_KEYS)],
    );
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("German", "de")]);

    let summary = controller.run(&translator, None).await?;

    assert_eq!(summary.files_skipped, vec!["Forge"]);
    assert_eq!(summary.documents_created, vec!["AboutBox.de.resx"]);
    assert!(!dir.join("Forge.de.resx").exists());
    Ok(())
}

/// Test that nothing is requested when no source text is available
#[tokio::test]
async fn test_run_withoutAnySourceText_shouldNotCallTranslator() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();

    let config = common::test_config(dir, &[("German", "de")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[]);

    let summary = controller.run(&translator, None).await?;

    assert!(translator.calls().is_empty());
    assert_eq!(summary.files_skipped, vec!["AboutBox"]);
    assert_eq!(summary.languages_translated, 0);
    Ok(())
}

/// Test that a missing resource directory aborts the run
#[tokio::test]
async fn test_run_withMissingResourceDir_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let missing = temp_dir.path().join("missing");

    let config = common::test_config(&missing, &[("German", "de")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[]);

    assert!(controller.run(&translator, None).await.is_err());
    assert!(translator.calls().is_empty());
    Ok(())
}

/// Test that existing translations are kept and missing ones appended
#[tokio::test]
async fn test_run_withExistingTranslation_shouldNotOverwrite() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;
    common::write_source_resx(dir, "AboutBox.fr-FR", &[("okButton.Text", "D'accord")])?;

    let config = common::test_config(dir, &[("French (France)", "fr-FR")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("French (France)", "fr")]);

    let summary = controller.run(&translator, None).await?;

    assert!(summary.documents_created.is_empty());
    assert_eq!(summary.documents_updated, 1);
    assert_eq!(summary.entries_inserted, 1);
    assert_eq!(summary.entries_skipped, 1);

    let document = read_document(&dir.join("AboutBox.fr-FR.resx"))?;
    assert_eq!(document.value_of("okButton.Text"), Some("D'accord"));
    assert_eq!(document.value_of("this.Text"), Some("About (fr)"));
    Ok(())
}

/// Test that created documents are registered with the build manifest once
#[tokio::test]
async fn test_run_withManifest_shouldRegisterCreatedDocuments() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;
    common::create_test_file(dir, "TextCraft.csproj", common::SAMPLE_CSPROJ)?;

    let mut config = common::test_config(
        dir,
        &[("French (France)", "fr-FR"), ("German", "de")],
        &[("AboutBox", ABOUT_BOX_KEYS)],
    );
    config.manifest_path = Some("TextCraft.csproj".into());
    let controller = Controller::with_config(config).without_progress();
    let translator = StubTranslator::new(&[("French (France)", "fr"), ("German", "de")]);

    let mut manifest = controller.open_manifest()?.expect("manifest is configured");
    let summary = controller
        .run(&translator, Some(&mut manifest as &mut dyn BuildManifest))
        .await?;
    assert_eq!(summary.manifest_registered, 2);

    let resources = manifest.embedded_resources()?;
    assert!(resources.contains("AboutBox.fr-FR.resx"));
    assert!(resources.contains("AboutBox.de.resx"));

    let project = fs::read_to_string(dir.join("TextCraft.csproj"))?;
    let summary = controller
        .run(&translator, Some(&mut manifest as &mut dyn BuildManifest))
        .await?;
    assert_eq!(summary.manifest_registered, 0);
    assert_eq!(fs::read_to_string(dir.join("TextCraft.csproj"))?, project);
    Ok(())
}

/// Test that a configured but missing manifest cannot be opened
#[test]
fn test_openManifest_withMissingProject_shouldFail() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path(), &[("German", "de")], &[("AboutBox", ABOUT_BOX_KEYS)]);
    config.manifest_path = Some("Missing.csproj".into());

    assert!(Controller::with_config(config).open_manifest().is_err());
    Ok(())
}

/// Test that existing localized documents can be registered after the fact
#[tokio::test]
async fn test_registerExisting_shouldListLocalizedDocuments() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;
    let project_path = common::create_test_file(dir, "TextCraft.csproj", common::SAMPLE_CSPROJ)?;

    let config = common::test_config(
        dir,
        &[("French (France)", "fr-FR"), ("German", "de")],
        &[("AboutBox", ABOUT_BOX_KEYS)],
    );
    let controller = Controller::with_config(config).without_progress();
    controller
        .run(&StubTranslator::new(&[("French (France)", "fr")]).failing_for("German"), None)
        .await?;

    let mut manifest = CsprojManifest::open(&project_path)?;
    assert_eq!(controller.register_existing(&mut manifest)?, 1);
    assert!(manifest.embedded_resources()?.contains("AboutBox.fr-FR.resx"));
    assert_eq!(controller.register_existing(&mut manifest)?, 0);
    Ok(())
}

/// Test that cleaning removes every localized document and keeps the source
#[tokio::test]
async fn test_clean_shouldRemoveLocalizedDocuments() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::write_about_box(dir)?;

    let config = common::test_config(
        dir,
        &[("French (France)", "fr-FR"), ("German", "de")],
        &[("AboutBox", ABOUT_BOX_KEYS)],
    );
    let controller = Controller::with_config(config).without_progress();
    controller
        .run(&StubTranslator::new(&[("French (France)", "fr"), ("German", "de")]), None)
        .await?;
    assert!(dir.join("AboutBox.de.resx").exists());

    let report = controller.clean()?;

    assert_eq!(report.deleted.len(), 2);
    assert!(report.failed.is_empty());
    assert!(dir.join("AboutBox.resx").exists());
    assert!(!dir.join("AboutBox.fr-FR.resx").exists());
    assert!(!dir.join("AboutBox.de.resx").exists());
    Ok(())
}
