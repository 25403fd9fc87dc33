/*!
 * The batch-translation-and-merge pipeline stages.
 *
 * - `catalog`: Reading translatable entries from neutral resource documents
 * - `batch`: Grouping entries into one job per target language
 * - `core`: The translation boundary and the provider-backed service
 * - `formatting`: Numbered-list encoding and reply parsing
 * - `prompts`: Prompt templates
 * - `reconcile`: Mapping translated strings back to their keys
 * - `merge`: Idempotent insertion into per-language documents
 */

// Re-export main types for easier usage
pub use self::batch::{JobPlan, ReconciliationIndex, TranslationBatcher, TranslationJob};
pub use self::catalog::{CatalogEntry, StringCatalog};
pub use self::core::{TextTranslator, TranslationService};
pub use self::merge::{MergeReport, ResourceMerger};
pub use self::prompts::PromptTemplate;
pub use self::reconcile::{ReconciledEntry, Reconciliation, ResultReconciler};

// Submodules
pub mod batch;
pub mod catalog;
pub mod core;
pub mod formatting;
pub mod merge;
pub mod prompts;
pub mod reconcile;
