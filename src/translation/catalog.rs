/*!
 * String catalog: the translatable entries of the neutral resource documents.
 */

use log::{debug, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::app_config::ResourceFileSpec;
use crate::errors::CatalogError;
use crate::file_utils::FileManager;
use crate::resx::ResxDocument;

/// One string slated for translation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogEntry {
    /// Resource document the entry was read from, e.g. "AboutBox"
    pub resource_file: String,
    /// Entry name, e.g. "okButton.Text"
    pub key: String,
    /// Neutral-language value
    pub source_text: String,
}

impl CatalogEntry {
    pub fn new(resource_file: impl Into<String>, key: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            resource_file: resource_file.into(),
            key: key.into(),
            source_text: source_text.into(),
        }
    }
}

/// Reads allow-listed entries out of neutral resource documents
#[derive(Debug, Clone)]
pub struct StringCatalog {
    resource_dir: PathBuf,
    extension: String,
}

impl StringCatalog {
    pub fn new(resource_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            extension: extension.into(),
        }
    }

    /// Location of the neutral document for a resource file
    pub fn source_path(&self, resource_file: &str) -> PathBuf {
        FileManager::source_path(&self.resource_dir, resource_file, &self.extension)
    }

    /// Read the entries of one resource file, in document order.
    ///
    /// Keys outside the allow-list, keys missing from the document and
    /// entries whose value is empty or whitespace-only are skipped.
    /// When a name occurs twice in the document the first one is used.
    pub fn read(&self, spec: &ResourceFileSpec) -> Result<Vec<CatalogEntry>, CatalogError> {
        let path = self.source_path(&spec.name);
        if !FileManager::file_exists(&path) {
            return Err(CatalogError::DocumentNotFound { path });
        }

        let content = FileManager::read_to_string(&path).map_err(|e| parse_error(&path, e))?;
        let document = ResxDocument::parse(&content).map_err(|e| parse_error(&path, e))?;

        let allowed: HashSet<&str> = spec.keys.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for entry in document.entries() {
            if !allowed.contains(entry.name.as_str()) || !seen.insert(entry.name.as_str()) {
                continue;
            }
            match entry.value.as_deref() {
                Some(value) if !value.trim().is_empty() => {
                    entries.push(CatalogEntry::new(&spec.name, &entry.name, value));
                }
                _ => debug!("Skipping {}/{}: empty value", spec.name, entry.name),
            }
        }

        for key in &spec.keys {
            if !seen.contains(key.as_str()) {
                debug!("Key {} not present in {}", key, path.display());
            }
        }

        Ok(entries)
    }

    /// Read every resource file. Files that cannot be read are reported
    /// with their error and left out of the catalog.
    pub fn read_all(&self, specs: &[ResourceFileSpec]) -> (Vec<CatalogEntry>, Vec<(String, CatalogError)>) {
        let mut entries = Vec::new();
        let mut failures = Vec::new();

        for spec in specs {
            match self.read(spec) {
                Ok(mut file_entries) => {
                    debug!("Catalogued {} entries from {}", file_entries.len(), spec.name);
                    entries.append(&mut file_entries);
                }
                Err(e) => {
                    warn!("Skipping resource file {}: {}", spec.name, e);
                    failures.push((spec.name.clone(), e));
                }
            }
        }

        (entries, failures)
    }
}

fn parse_error(path: &Path, error: impl std::fmt::Display) -> CatalogError {
    CatalogError::DocumentParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
