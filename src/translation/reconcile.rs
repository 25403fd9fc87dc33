/*!
 * Reconciliation of translated strings with the keys they belong to.
 */

use log::warn;

use crate::app_config::ReconcileMode;
use crate::errors::{ReconcileError, TranslationError};

use super::batch::{ReconciliationIndex, TranslationJob};

/// A translated string tied back to its resource file and key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledEntry {
    pub resource_file: String,
    pub key: String,
    pub translated_text: String,
}

/// Outcome of reconciling one language job
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Entries ready to merge, in job order
    pub entries: Vec<ReconciledEntry>,
    /// Entries that could not be tied to a key and were skipped
    pub unresolved: Vec<ReconcileError>,
}

impl Reconciliation {
    /// Entries grouped per resource file, files in order of first appearance
    pub fn by_resource_file(&self) -> Vec<(&str, Vec<(&str, &str)>)> {
        let mut groups: Vec<(&str, Vec<(&str, &str)>)> = Vec::new();
        for entry in &self.entries {
            let pair = (entry.key.as_str(), entry.translated_text.as_str());
            match groups.iter_mut().find(|(file, _)| *file == entry.resource_file) {
                Some((_, pairs)) => pairs.push(pair),
                None => groups.push((entry.resource_file.as_str(), vec![pair])),
            }
        }
        groups
    }
}

/// Maps a job's translated strings back onto (resource file, key) pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler {
    mode: ReconcileMode,
}

impl ResultReconciler {
    pub fn new(mode: ReconcileMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ReconcileMode {
        self.mode
    }

    /// Pair every job entry with its translation.
    ///
    /// `Positional` uses the translation at the entry's own position once the
    /// index confirms the key. `FirstOccurrence` uses the translation at the
    /// first position where the same text occurs in the same resource file,
    /// so duplicates share one translation.
    pub fn reconcile(
        &self,
        job: &TranslationJob,
        translations: &[String],
        index: &ReconciliationIndex,
    ) -> Result<Reconciliation, TranslationError> {
        if translations.len() != job.len() {
            return Err(TranslationError::CountMismatch {
                expected: job.len(),
                actual: translations.len(),
            });
        }

        let language = job.language.code.as_str();
        let mut reconciliation = Reconciliation::default();

        for (position, entry) in job.entries.iter().enumerate() {
            let source = match self.mode {
                ReconcileMode::Positional => index
                    .contains_key(language, &entry.resource_file, &entry.source_text, &entry.key)
                    .then_some(position),
                ReconcileMode::FirstOccurrence => index
                    .first_position(language, &entry.resource_file, &entry.source_text),
            };

            match source.and_then(|p| translations.get(p)) {
                Some(translated) => reconciliation.entries.push(ReconciledEntry {
                    resource_file: entry.resource_file.clone(),
                    key: entry.key.clone(),
                    translated_text: translated.clone(),
                }),
                None => {
                    let error = ReconcileError::KeyNotFoundInIndex {
                        language: language.to_string(),
                        resource_file: entry.resource_file.clone(),
                        key: entry.key.clone(),
                        source_text: entry.source_text.clone(),
                    };
                    warn!("{}: skipping {}/{}", error, entry.resource_file, entry.key);
                    reconciliation.unresolved.push(error);
                }
            }
        }

        Ok(reconciliation)
    }
}
