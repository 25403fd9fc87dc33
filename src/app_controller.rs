use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::fmt;
use std::time::Instant;

use crate::app_config::Config;
use crate::file_utils::{CleanupReport, FileManager};
use crate::manifest::{BuildManifest, CsprojManifest};
use crate::translation::{ResourceMerger, ResultReconciler, StringCatalog, TextTranslator, TranslationBatcher};

// @module: Application controller for the localization pipeline

/// Totals of one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Languages whose job was translated and merged
    pub languages_translated: usize,
    /// Codes of languages whose translation failed
    pub languages_failed: Vec<String>,
    /// Resource files left out because their source could not be read
    pub files_skipped: Vec<String>,
    /// File names of documents created by this run
    pub documents_created: Vec<String>,
    /// Existing documents that received new entries
    pub documents_updated: usize,
    /// Documents that could not be loaded or saved
    pub documents_failed: usize,
    /// Entries appended
    pub entries_inserted: usize,
    /// Entries already present and left unchanged
    pub entries_skipped: usize,
    /// Entries that could not be tied back to their key
    pub entries_unreconciled: usize,
    /// Documents newly registered with the build manifest
    pub manifest_registered: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} languages translated, {} failed; {} documents created, {} updated, {} failed; \
             {} entries inserted, {} already present, {} unreconciled; {} source files skipped; \
             {} manifest entries added",
            self.languages_translated,
            self.languages_failed.len(),
            self.documents_created.len(),
            self.documents_updated,
            self.documents_failed,
            self.entries_inserted,
            self.entries_skipped,
            self.entries_unreconciled,
            self.files_skipped.len(),
            self.manifest_registered,
        )
    }
}

/// Main application controller for resource translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Whether to draw a progress bar
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            show_progress: true,
        }
    }

    /// Disable the progress bar (tests, non-interactive callers)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open the configured build manifest.
    /// `Ok(None)` when no manifest is configured; an error when it is missing.
    pub fn open_manifest(&self) -> Result<Option<CsprojManifest>> {
        match self.config.resolved_manifest_path() {
            Some(path) => {
                let manifest = CsprojManifest::open(&path)
                    .with_context(|| format!("Cannot use build manifest {:?}", path))?;
                Ok(Some(manifest))
            }
            None => Ok(None),
        }
    }

    fn check_resource_dir(&self) -> Result<()> {
        if !FileManager::dir_exists(&self.config.resource_dir) {
            return Err(anyhow!(
                "Resource directory does not exist: {:?}",
                self.config.resource_dir
            ));
        }
        Ok(())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} languages ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    /// Run the pipeline: catalog, plan, translate each language in turn,
    /// reconcile, merge, then register new documents with the manifest.
    ///
    /// Only a missing resource directory aborts the run. Unreadable source
    /// documents, failed languages, unreconciled entries and unsaved
    /// documents are logged, counted and skipped.
    pub async fn run(
        &self,
        translator: &dyn TextTranslator,
        manifest: Option<&mut dyn BuildManifest>,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();
        self.check_resource_dir()?;

        let extension = self.config.extension();
        let catalog = StringCatalog::new(&self.config.resource_dir, extension);
        let merger = ResourceMerger::new(&self.config.resource_dir, extension);
        let reconciler = ResultReconciler::new(self.config.reconcile_mode);

        let mut summary = RunSummary::default();

        let (entries, failures) = catalog.read_all(&self.config.resource_files);
        summary.files_skipped = failures.into_iter().map(|(name, _)| name).collect();
        if entries.is_empty() {
            warn!("No text to translate in {:?}", self.config.resource_dir);
            return Ok(summary);
        }

        let plan = TranslationBatcher::plan(&entries, &self.config.languages);
        info!(
            "Translating {} entries into {} languages ({} reconciliation)",
            entries.len(),
            plan.jobs.len(),
            reconciler.mode()
        );

        let progress_bar = self.progress_bar(plan.jobs.len() as u64);

        for job in &plan.jobs {
            let language = &job.language;
            progress_bar.set_message(language.display_name.clone());

            let reconciliation = match translator.translate_batch(&job.texts(), &language.display_name).await {
                Ok(translations) => reconciler.reconcile(job, &translations, &plan.index),
                Err(e) => Err(e),
            };
            let reconciliation = match reconciliation {
                Ok(reconciliation) => reconciliation,
                Err(e) => {
                    error!("Translation failed for {} ({}): {}", language.display_name, language.code, e);
                    summary.languages_failed.push(language.code.clone());
                    progress_bar.inc(1);
                    continue;
                }
            };
            summary.entries_unreconciled += reconciliation.unresolved.len();

            for (resource_file, pairs) in reconciliation.by_resource_file() {
                match merger.merge_batch(resource_file, &language.code, &pairs) {
                    Ok(report) => {
                        summary.entries_inserted += report.inserted;
                        summary.entries_skipped += report.skipped;
                        if report.created {
                            summary
                                .documents_created
                                .push(merger.output_file_name(resource_file, &language.code));
                        } else if report.inserted > 0 {
                            summary.documents_updated += 1;
                        }
                    }
                    Err(e) => {
                        error!("Skipping {} for {}: {}", resource_file, language.code, e);
                        summary.documents_failed += 1;
                    }
                }
            }

            summary.languages_translated += 1;
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        if let Some(manifest) = manifest {
            if !summary.documents_created.is_empty() {
                match manifest.register(&summary.documents_created) {
                    Ok(count) => summary.manifest_registered = count,
                    Err(e) => error!("Failed to update build manifest: {}", e),
                }
            }
        }

        info!("Finished in {:.1}s: {}", start_time.elapsed().as_secs_f64(), summary);
        Ok(summary)
    }

    /// Delete every localized document of the configured resource files
    pub fn clean(&self) -> Result<CleanupReport> {
        self.check_resource_dir()?;

        let mut report = CleanupReport::default();
        for file in &self.config.resource_files {
            let mut file_report =
                FileManager::delete_localized_files(&self.config.resource_dir, &file.name, self.config.extension())?;
            report.deleted.append(&mut file_report.deleted);
            report.failed.append(&mut file_report.failed);
        }

        info!("Deleted {} files, {} failures", report.deleted.len(), report.failed.len());
        Ok(report)
    }

    /// Register every existing localized document of the configured
    /// resource files and languages with the manifest
    pub fn register_existing(&self, manifest: &mut dyn BuildManifest) -> Result<usize> {
        self.check_resource_dir()?;

        let merger = ResourceMerger::new(&self.config.resource_dir, self.config.extension());
        let mut names = Vec::new();
        for file in &self.config.resource_files {
            for language in &self.config.languages {
                if FileManager::file_exists(merger.output_path(&file.name, &language.code)) {
                    names.push(merger.output_file_name(&file.name, &language.code));
                }
            }
        }

        let count = manifest.register(&names)?;
        info!("Registered {} of {} localized documents", count, names.len());
        Ok(count)
    }
}
