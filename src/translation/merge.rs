/*!
 * Idempotent merge of translated entries into per-language documents.
 *
 * Output documents are named `{resource_file}.{language_code}.{ext}`.
 * A missing document is created from the template; existing entries are
 * never overwritten, so merging the same data twice changes nothing.
 */

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::errors::MergeError;
use crate::file_utils::FileManager;
use crate::resx::ResxDocument;

/// Result of merging into one output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Output document path
    pub path: PathBuf,
    /// Whether the document was created by this merge
    pub created: bool,
    /// Keys appended
    pub inserted: usize,
    /// Keys left alone because they already existed
    pub skipped: usize,
}

impl MergeReport {
    /// Whether the document on disk changed
    pub fn is_changed(&self) -> bool {
        self.created || self.inserted > 0
    }
}

/// Writes translated entries into per-language resource documents
#[derive(Debug, Clone)]
pub struct ResourceMerger {
    resource_dir: PathBuf,
    extension: String,
}

impl ResourceMerger {
    pub fn new(resource_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            extension: extension.into(),
        }
    }

    /// Path of the output document for (resource file, language code)
    pub fn output_path(&self, resource_file: &str, language_code: &str) -> PathBuf {
        FileManager::generate_output_path(&self.resource_dir, resource_file, language_code, &self.extension)
    }

    /// File name of the output document, as registered in a build manifest
    pub fn output_file_name(&self, resource_file: &str, language_code: &str) -> String {
        format!("{}.{}.{}", resource_file, language_code, self.extension)
    }

    /// Merge a single translated entry
    pub fn merge(
        &self,
        resource_file: &str,
        language_code: &str,
        key: &str,
        translated_text: &str,
    ) -> Result<MergeReport, MergeError> {
        self.merge_batch(resource_file, language_code, &[(key, translated_text)])
    }

    /// Merge several entries into one document: load once, append every
    /// absent key, persist once. Within the batch the first pair for a key wins.
    pub fn merge_batch(
        &self,
        resource_file: &str,
        language_code: &str,
        entries: &[(&str, &str)],
    ) -> Result<MergeReport, MergeError> {
        let path = self.output_path(resource_file, language_code);
        let created = !FileManager::file_exists(&path);

        let mut document = if created {
            ResxDocument::from_template()
        } else {
            load(&path)?
        };

        let mut inserted = 0;
        let mut skipped = 0;
        for (key, translated_text) in entries {
            if document.insert_if_absent(key, translated_text) {
                inserted += 1;
            } else {
                debug!("{} already has {}, keeping existing value", path.display(), key);
                skipped += 1;
            }
        }

        if created || document.is_modified() {
            let xml = document.to_xml().map_err(|e| persist_error(&path, e))?;
            FileManager::write_atomically(&path, &xml).map_err(|e| persist_error(&path, e))?;
            info!(
                "{} {} ({} new entries)",
                if created { "Created" } else { "Updated" },
                path.display(),
                inserted
            );
        }

        Ok(MergeReport {
            path,
            created,
            inserted,
            skipped,
        })
    }
}

fn load(path: &Path) -> Result<ResxDocument, MergeError> {
    let content = FileManager::read_to_string(path).map_err(|e| MergeError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ResxDocument::parse(&content).map_err(|e| MergeError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn persist_error(path: &Path, error: impl std::fmt::Display) -> MergeError {
    MergeError::Persist {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
