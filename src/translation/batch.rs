/*!
 * Batch planning: one translation job per target language.
 *
 * Every job carries every catalog entry (across all resource files) in
 * catalog order, so a language costs a single provider call. Identical
 * source texts under different keys are kept as separate positions.
 */

use std::collections::HashMap;

use crate::app_config::LanguageSpec;

use super::catalog::CatalogEntry;

/// All entries to translate for one language, in catalog order
#[derive(Debug, Clone)]
pub struct TranslationJob {
    /// Target language
    pub language: LanguageSpec,
    /// Entries; position `i` corresponds to translated line `i`
    pub entries: Vec<CatalogEntry>,
}

impl TranslationJob {
    /// Outbound texts, in job order
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.source_text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a (language, resource file, source text) triple occurs in its job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSlot {
    /// Job position of the first occurrence
    pub first_position: usize,
    /// Keys registered for this text, in job order
    pub keys: Vec<String>,
}

/// Map from (language code, resource file, source text) to the keys it was
/// extracted under, built while planning jobs
#[derive(Debug, Clone, Default)]
pub struct ReconciliationIndex {
    slots: HashMap<(String, String, String), IndexSlot>,
}

impl ReconciliationIndex {
    fn register(&mut self, language_code: &str, entry: &CatalogEntry, position: usize) {
        let slot = self
            .slots
            .entry((
                language_code.to_string(),
                entry.resource_file.clone(),
                entry.source_text.clone(),
            ))
            .or_insert_with(|| IndexSlot {
                first_position: position,
                keys: Vec::new(),
            });
        if !slot.keys.contains(&entry.key) {
            slot.keys.push(entry.key.clone());
        }
    }

    /// Slot for a triple, if any entry registered it
    pub fn lookup(&self, language_code: &str, resource_file: &str, source_text: &str) -> Option<&IndexSlot> {
        self.slots.get(&(
            language_code.to_string(),
            resource_file.to_string(),
            source_text.to_string(),
        ))
    }

    /// Whether `key` was registered for the triple
    pub fn contains_key(&self, language_code: &str, resource_file: &str, source_text: &str, key: &str) -> bool {
        self.lookup(language_code, resource_file, source_text)
            .is_some_and(|slot| slot.keys.iter().any(|k| k == key))
    }

    /// Job position of the first occurrence of the triple
    pub fn first_position(&self, language_code: &str, resource_file: &str, source_text: &str) -> Option<usize> {
        self.lookup(language_code, resource_file, source_text)
            .map(|slot| slot.first_position)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Jobs for every language plus the index used to reconcile their results
#[derive(Debug, Clone, Default)]
pub struct JobPlan {
    pub jobs: Vec<TranslationJob>,
    pub index: ReconciliationIndex,
}

/// Groups catalog entries per target language
pub struct TranslationBatcher;

impl TranslationBatcher {
    /// Build one job per language, in language order, each holding every
    /// entry in catalog order
    pub fn plan(entries: &[CatalogEntry], languages: &[LanguageSpec]) -> JobPlan {
        let mut plan = JobPlan::default();

        for language in languages {
            for (position, entry) in entries.iter().enumerate() {
                plan.index.register(&language.code, entry, position);
            }
            plan.jobs.push(TranslationJob {
                language: language.clone(),
                entries: entries.to_vec(),
            });
        }

        plan
    }
}
