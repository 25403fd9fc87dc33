/*!
 * Common test utilities for the resxai test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use resxai::app_config::{Config, LanguageSpec, ResourceFileSpec, TranslationProvider};
use resxai::errors::{ProviderError, TranslationError};
use resxai::translation::TextTranslator;

/// Route library logs through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A small resource document holding the given (name, value) entries
pub fn resx_with_entries(entries: &[(&str, &str)]) -> String {
    let mut content = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n  <resheader name=\"resmimetype\">\n    <value>text/microsoft-resx</value>\n  </resheader>\n",
    );
    for (name, value) in entries {
        content.push_str(&format!(
            "  <data name=\"{}\" xml:space=\"preserve\">\n    <value>{}</value>\n  </data>\n",
            name,
            escape(value)
        ));
    }
    content.push_str("</root>\n");
    content
}

/// Writes `{name}.resx` with the given entries
pub fn write_source_resx(dir: &Path, name: &str, entries: &[(&str, &str)]) -> Result<PathBuf> {
    create_test_file(dir, &format!("{}.resx", name), &resx_with_entries(entries))
}

/// Writes the AboutBox source document used by most scenarios
pub fn write_about_box(dir: &Path) -> Result<PathBuf> {
    write_source_resx(dir, "AboutBox", &[("okButton.Text", "OK"), ("this.Text", "About")])
}

/// A minimal MSBuild project with one item group
pub const SAMPLE_CSPROJ: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="15.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Compile Include="AboutBox.cs" />
    <EmbeddedResource Include="AboutBox.resx">
      <DependentUpon>AboutBox.cs</DependentUpon>
    </EmbeddedResource>
  </ItemGroup>
</Project>
"#;

/// Configuration for tests: resources in `dir`, no manifest, an API key set
pub fn test_config(dir: &Path, languages: &[(&str, &str)], files: &[(&str, &[&str])]) -> Config {
    let mut config = Config::default();
    config.resource_dir = dir.to_path_buf();
    config.manifest_path = None;
    config.languages = languages
        .iter()
        .map(|(name, code)| LanguageSpec::new(*name, *code))
        .collect();
    config.resource_files = files
        .iter()
        .map(|(name, keys)| ResourceFileSpec::new(*name, keys.iter().copied()))
        .collect();
    config.translation.provider = TranslationProvider::OpenAI;
    config.translation.active_provider_config_mut().api_key = "test-key".to_string();
    config
}

/// Deterministic translator: appends a per-language tag, records every call
/// and fails for configured languages
pub struct StubTranslator {
    tags: Vec<(String, String)>,
    failing: HashSet<String>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl StubTranslator {
    /// `tags` maps language names to the suffix appended to every text
    pub fn new(tags: &[(&str, &str)]) -> Self {
        Self {
            tags: tags.iter().map(|(l, t)| (l.to_string(), t.to_string())).collect(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make calls for `language_name` fail with a transport error
    pub fn failing_for(mut self, language_name: &str) -> Self {
        self.failing.insert(language_name.to_string());
        self
    }

    /// Calls received so far as (language name, texts)
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    fn tag(&self, language_name: &str) -> String {
        self.tags
            .iter()
            .find(|(language, _)| language == language_name)
            .map(|(_, tag)| tag.clone())
            .unwrap_or_else(|| language_name.to_string())
    }
}

#[async_trait]
impl TextTranslator for StubTranslator {
    async fn translate_batch(&self, texts: &[String], language_name: &str) -> Result<Vec<String>, TranslationError> {
        self.calls
            .lock()
            .unwrap()
            .push((language_name.to_string(), texts.to_vec()));

        if self.failing.contains(language_name) {
            return Err(TranslationError::Provider(ProviderError::ConnectionError(
                "connection refused".to_string(),
            )));
        }

        let tag = self.tag(language_name);
        Ok(texts.iter().map(|text| format!("{} ({})", text, tag)).collect())
    }
}
