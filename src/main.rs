// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use resxai::app_config::{self, Config, ReconcileMode, TranslationProvider};
use resxai::manifest::BuildManifest;
use resxai::{Controller, TranslationService};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::LMStudio => TranslationProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for ReconcileMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliReconcileMode {
    Positional,
    FirstOccurrence,
}

impl From<CliReconcileMode> for ReconcileMode {
    fn from(cli_mode: CliReconcileMode) -> Self {
        match cli_mode {
            CliReconcileMode::Positional => ReconcileMode::Positional,
            CliReconcileMode::FirstOccurrence => ReconcileMode::FirstOccurrence,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the configured resource files (default command)
    Translate,

    /// Delete every localized resource file of the configured resource files
    Clean,

    /// Register existing localized resource files with the build manifest
    Manifest,

    /// Generate shell completions for resxai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// resxai - AI-assisted localization of .NET resource files
#[derive(Parser, Debug)]
#[command(name = "resxai")]
#[command(version = "0.1.0")]
#[command(about = "Translate .resx resource files into many languages with AI providers")]
#[command(long_about = "resxai reads the allow-listed strings of neutral .resx files, translates them
with one request per target language and merges the results into
{file}.{culture}.resx documents. Existing translations are never overwritten.

EXAMPLES:
    resxai                                   # Translate using default config
    resxai -L fr-FR -L de                    # Only French and German
    resxai -f AboutBox --no-manifest         # One resource file, leave the project alone
    resxai -p ollama -m llama3.1             # Use a local model
    resxai clean                             # Delete all localized files
    resxai manifest                          # Register existing localized files
    resxai completions bash > resxai.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in resxai.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "resxai.json", global = true)]
    config_path: PathBuf,

    /// Directory containing the resource files
    #[arg(short = 'd', long, global = true)]
    resource_dir: Option<PathBuf>,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key for the provider
    #[arg(long, env = "RESXAI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Restrict the run to these language codes (repeatable)
    #[arg(short = 'L', long = "language", global = true)]
    languages: Vec<String>,

    /// Restrict the run to these resource files (repeatable)
    #[arg(short = 'f', long = "file", global = true)]
    files: Vec<String>,

    /// How translated strings are mapped back to keys
    #[arg(long, value_enum, global = true)]
    reconcile: Option<CliReconcileMode>,

    /// Do not update the build manifest
    #[arg(long, global = true)]
    no_manifest: bool,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌ "),
            Level::Warn => ("\x1B[1;33m", "🚧 "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍 "),
            Level::Trace => ("\x1B[1;35m", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (color, marker) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let mut cli = CommandLineOptions::parse();

    let command = match cli.command.take() {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "resxai", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Translate) | None => Commands::Translate,
        Some(other) => other,
    };

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    match command {
        Commands::Clean => {
            config.validate_resources().context("Configuration validation failed")?;
            let report = Controller::with_config(config).clean()?;
            if !report.failed.is_empty() {
                warn!("{} files could not be deleted", report.failed.len());
            }
            Ok(())
        }
        Commands::Manifest => {
            config.validate_resources().context("Configuration validation failed")?;
            let controller = Controller::with_config(config);
            match controller.open_manifest()? {
                Some(mut manifest) => {
                    controller.register_existing(&mut manifest)?;
                }
                None => warn!("No build manifest configured"),
            }
            Ok(())
        }
        _ => run_translate(config, cli.no_manifest).await,
    }
}

/// Load the config file (or create the default one) and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let (mut config, created) = Config::load_or_create(&cli.config_path)?;
    if created {
        warn!("Config file not found at {:?}, created default config.", cli.config_path);
    }

    if let Some(resource_dir) = &cli.resource_dir {
        config.resource_dir = resource_dir.clone();
    }
    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }
    if let Some(mode) = &cli.reconcile {
        config.reconcile_mode = mode.clone().into();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    if cli.no_manifest {
        config.manifest_path = None;
    }
    config.apply_filters(&cli.languages, &cli.files)?;

    Ok(config)
}

async fn run_translate(config: Config, no_manifest: bool) -> Result<()> {
    config.validate().context("Configuration validation failed")?;

    if !resxai::file_utils::FileManager::dir_exists(&config.resource_dir) {
        return Err(anyhow::anyhow!("Resource directory does not exist: {:?}", config.resource_dir));
    }

    let controller = Controller::with_config(config.clone());
    let mut manifest = if no_manifest { None } else { controller.open_manifest()? };

    let service = TranslationService::new(config.translation.clone())?;
    info!(
        "Using {} - {} on {}",
        config.translation.provider.display_name(),
        config.translation.get_model(),
        display_path(&config.resource_dir)
    );

    let summary = controller
        .run(&service, manifest.as_mut().map(|m| m as &mut dyn BuildManifest))
        .await?;

    if !summary.languages_failed.is_empty() {
        warn!("Failed languages: {}", summary.languages_failed.join(", "));
    }

    Ok(())
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
