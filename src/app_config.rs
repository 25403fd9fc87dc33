use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// The configuration is read once and passed by reference into the pipeline;
/// nothing in it changes while a run is in progress.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the neutral resource documents and their translations
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,

    /// File extension of the resource documents
    #[serde(default = "default_resource_extension")]
    pub resource_extension: String,

    /// Build manifest to register new documents with (relative to `resource_dir`)
    #[serde(default = "default_manifest_path")]
    pub manifest_path: Option<PathBuf>,

    /// Target languages
    #[serde(default = "crate::language_utils::default_languages")]
    pub languages: Vec<LanguageSpec>,

    /// Resource documents and the keys to translate in each of them
    #[serde(default = "default_resource_files")]
    pub resource_files: Vec<ResourceFileSpec>,

    /// How translated strings are mapped back onto keys
    #[serde(default)]
    pub reconcile_mode: ReconcileMode,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A target language: the name sent to the translator and the culture code
/// used in output file names
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct LanguageSpec {
    /// Human readable name, e.g. "French (France)"
    pub display_name: String,
    /// Culture code, e.g. "fr-FR"
    pub code: String,
}

impl LanguageSpec {
    pub fn new(display_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            code: code.into(),
        }
    }
}

/// A neutral resource document and the allow-list of keys to translate
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResourceFileSpec {
    /// Base name of the document, without extension (e.g. "AboutBox")
    pub name: String,
    /// Entry names to translate
    pub keys: Vec<String>,
}

impl ResourceFileSpec {
    pub fn new<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// Strategy used to attach a translated string to its key
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Every job entry keeps its key; position decides the translation
    #[default]
    Positional,
    /// Duplicate source texts within a file share the translation of their
    /// first occurrence
    FirstOccurrence,
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positional => write!(f, "positional"),
            Self::FirstOccurrence => write!(f, "first_occurrence"),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    /// Hosted providers need an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt for batch translation
    /// Placeholder: {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of tokens the provider may generate per language
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("..")
}

fn default_resource_extension() -> String {
    "resx".to_string()
}

fn default_manifest_path() -> Option<PathBuf> {
    Some(PathBuf::from("TextCraft.csproj"))
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    16384
}

fn default_model(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::OpenAI => "gpt-4o-mini".to_string(),
        TranslationProvider::Anthropic => "claude-3-5-haiku-latest".to_string(),
        TranslationProvider::Ollama => "llama3.1".to_string(),
        // Placeholder; users should set to the loaded model name in LM Studio
        TranslationProvider::LMStudio => "local-model".to_string(),
    }
}

fn default_endpoint(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
        TranslationProvider::LMStudio => "http://localhost:1234/v1".to_string(),
    }
}

fn default_system_prompt() -> String {
    crate::translation::prompts::DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Keys of the TextCraft add-in that carry user-facing text
pub fn default_resource_files() -> Vec<ResourceFileSpec> {
    vec![
        ResourceFileSpec::new(
            "AboutBox",
            [
                "okButton.Text",
                "[AboutBox()] this.Text",
                "[AboutBox()] this.labelVersion.Text",
                "this.labelCopyright.Text",
                "this.labelCompanyName.Text",
                "$this.AccessibleDescription",
                "$this.Text",
            ],
        ),
        ResourceFileSpec::new(
            "Forge",
            [
                "this.ForgeTab.Label",
                "this.ToolsGroup.Label",
                "this.GenerateButton.Label",
                "this.GenerateButton.SuperTip",
                "this.DefaultCheckBox.Label",
                "this.AboutButton.Label",
                "this.AboutButton.ScreenTip",
                "this.CancelButton.Label",
                "this.CancelButton.ScreenTip",
                "this.WritingToolsGallery.Label",
                "this.WritingToolsGallery.SuperTip",
                "this.ReviewButton.Label",
                "this.ReviewButton.SuperTip",
                "this.ProofreadButton.Label",
                "this.ProofreadButton.SuperTip",
                "this.RewriteButton.Label",
                "this.RewriteButton.SuperTip",
                "this.SettingsGroup.Label",
                "this.SaveSettingsButton.Label",
                "this.ResetSettingsButton.Label",
                "this.RAGControlButton.Label",
                "this.RAGControlButton.SuperTip",
                "this.ModelListDropDown.Label",
                "this.ModelListDropDown.SuperTip",
                "this.DefaultCheckBox.SuperTip",
                "this.OptionsGroup.Label",
                "this.InfoGroup.Label",
                "(ThisAddIn.cs) [InitializeAddIn] ArgumentException #1",
                "[WritingToolsGallery_ButtonClick] ArgumentOutOfRangeException #1",
                "[ReviewButton_Click] MessageBox #1 (text)",
                "[ReviewButton_Click] MessageBox #1 (caption)",
                "(ModelProperties.cs) [GetContextLength] OllamaMissingContextWindowException #1",
                "(CommonUtils.cs) [GetInternetAccessPermission] MessageBox #1 Text",
                "(CommonUtils.cs) [GetInternetAccessPermission] MessageBox #1 Caption",
                "(WordMarkdown.cs) [ApplyMarkdownFormatting] ArgumentOutofRangeException #1",
                "(WordMarkdown.cs) [GetCodeBlockAtIndex] ApplicationException #1",
                "(WordMarkdown.cs) [ApplyImageFormatting] ArgumentException #1",
                "(WordMarkdown.cs) [ApplyHeadingFormatting] ArgumentException #1",
                "[AnalyzeText] InvalidRangeException #1",
                "this.CommentSystemPrompt",
                "(CommentHandler.cs) [AICommentReplyTask] UserChatMessage #1",
                "(CommentHandler.cs) [AICommentReplyTask] UserChatMessage #2",
                "[ProofreadButton_Click] SystemPrompt",
                "[ProofreadButton_Click] UserPrompt",
                "[RewriteButton_Click] SystemPrompt",
                "[RewriteButton_Click] UserPrompt",
                "[ReviewButton_Click] UserPrompt",
                "[Review] chatHistory #1",
                "(RAGControl.cs) [AskQuestion] chatHistory #1",
                "(RAGControl.cs) [AskQuestion] chatHistory #2",
                "(CommentHandler.cs) [AIUserMentionTask] UserMentionSystemPrompt",
            ],
        ),
        ResourceFileSpec::new(
            "GenerateUserControl",
            [
                "(GenerateUserControl.cs) _systemPrompt",
                "GenerateButton.Text",
                "[GenerateButton_Click] TextBoxEmptyException #1",
                "[GenerateButton_Click] TextBoxInvalidFormatException #2",
                "OutputLabel.Text",
                "PreviewButton.Text",
                "$this.Text",
            ],
        ),
        ResourceFileSpec::new(
            "PasswordPrompt",
            [
                "PasswordTextBox.AccessibleDescription",
                "PasswordTextBox.AccessibleName",
                "PasswordLabel.AccessibleDescription",
                "PasswordLabel.AccessibleName",
                "PasswordLabel.Text",
                "OkButton.AccessibleDescription",
                "OkButton.AccessibleName",
                "OkButton.Text",
                "CancelButton.Text",
                "$this.AccessibleDescription",
                "$this.Text",
            ],
        ),
        ResourceFileSpec::new(
            "RAGControl",
            [
                "FileListBox.AccessibleDescription",
                "FileListBox.AccessibleName",
                "AddButton.AccessibleDescription",
                "AddButton.AccessibleName",
                "AddButton.Text",
                "RemoveButton.AccessibleDescription",
                "RemoveButton.AccessibleName",
                "RemoveButton.Text",
                "[AddButton_Click] OpenFileDialog #1 Title",
                "[RemoveButton_Click] FileNotSelectedException #3",
                "[ReadPdfFileAsync] InvalidDataException #1",
                "SearchBar.PlaceholderText",
                "progressBar1.AccessibleDescription",
                "progressBar1.AccessibleName",
                "$this.AccessibleDescription",
                "$this.AccessibleName",
                "$this.Text",
            ],
        ),
    ]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.validate_resources()?;

        // Validate API key for hosted providers
        if self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        Ok(())
    }

    /// Validate languages and resource files only; enough for commands that
    /// never call a provider
    pub fn validate_resources(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(anyhow!("At least one target language must be configured"));
        }

        let mut seen_codes = HashSet::new();
        for language in &self.languages {
            if language.display_name.trim().is_empty() {
                return Err(anyhow!("Language '{}' has an empty display name", language.code));
            }
            crate::language_utils::validate_locale_code(&language.code)?;
            if !seen_codes.insert(language.code.to_lowercase()) {
                return Err(anyhow!("Language code '{}' is configured twice", language.code));
            }
        }

        if self.resource_files.is_empty() {
            return Err(anyhow!("At least one resource file must be configured"));
        }

        let mut seen_files = HashSet::new();
        for file in &self.resource_files {
            if file.name.trim().is_empty() {
                return Err(anyhow!("Resource file names cannot be empty"));
            }
            if file.keys.is_empty() {
                return Err(anyhow!("Resource file '{}' has no keys to translate", file.name));
            }
            if !seen_files.insert(file.name.as_str()) {
                return Err(anyhow!("Resource file '{}' is configured twice", file.name));
            }
        }

        if self.resource_extension.trim_start_matches('.').is_empty() {
            return Err(anyhow!("Resource extension cannot be empty"));
        }

        Ok(())
    }

    /// Extension without a leading dot
    pub fn extension(&self) -> &str {
        self.resource_extension.trim_start_matches('.')
    }

    /// Absolute or working-directory relative location of the build manifest
    pub fn resolved_manifest_path(&self) -> Option<PathBuf> {
        self.manifest_path.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.resource_dir.join(path)
            }
        })
    }

    /// Restrict the run to the given language codes and resource file names.
    /// Empty filters keep everything; unknown names are an error.
    pub fn apply_filters(&mut self, language_codes: &[String], resource_files: &[String]) -> Result<()> {
        if !language_codes.is_empty() {
            for code in language_codes {
                if !self.languages.iter().any(|l| l.code.eq_ignore_ascii_case(code)) {
                    return Err(anyhow!("Language '{}' is not configured", code));
                }
            }
            self.languages
                .retain(|l| language_codes.iter().any(|c| c.eq_ignore_ascii_case(&l.code)));
        }

        if !resource_files.is_empty() {
            for name in resource_files {
                if !self.resource_files.iter().any(|f| &f.name == name) {
                    return Err(anyhow!("Resource file '{}' is not configured", name));
                }
            }
            self.resource_files.retain(|f| resource_files.contains(&f.name));
        }

        Ok(())
    }

    /// Load the configuration file, or write and return the default one
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path, e))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;
            Ok((config, false))
        } else {
            let config = Config::default();
            let config_json = serde_json::to_string_pretty(&config)?;
            std::fs::write(path, config_json)
                .map_err(|e| anyhow!("Failed to write default config to {:?}: {}", path, e))?;
            Ok((config, true))
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            resource_dir: default_resource_dir(),
            resource_extension: default_resource_extension(),
            manifest_path: default_manifest_path(),
            languages: crate::language_utils::default_languages(),
            resource_files: default_resource_files(),
            reconcile_mode: ReconcileMode::default(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Mutable access to the active provider configuration, creating it if missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = match self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider_str)
        {
            Some(position) => position,
            None => {
                self.available_providers
                    .push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[position]
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_model(&self.provider)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Local providers don't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        default_endpoint(&self.provider)
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::LMStudio),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
