/*!
 * Error types for the resxai application.
 *
 * This module contains custom error types for the different stages of the
 * localization pipeline, using the thiserror crate for ergonomic error
 * definitions. Each stage fails at its own granularity: a catalog error
 * concerns one source document, a translation error one language, a
 * reconcile error one entry and a merge error one output document.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while reading a structured resource document
#[derive(Error, Debug)]
pub enum ResxError {
    /// The XML could not be parsed or does not have the expected shape
    #[error("Malformed resource document: {0}")]
    Parse(String),

    /// The document could not be serialized
    #[error("Failed to write resource document: {0}")]
    Write(String),
}

/// Errors raised by the string catalog for one source document
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The source document does not exist
    #[error("Source document not found: {}", path.display())]
    DocumentNotFound {
        /// Expected location of the source document
        path: PathBuf,
    },

    /// The source document exists but could not be read or parsed
    #[error("Failed to parse source document {}: {message}", path.display())]
    DocumentParse {
        /// Location of the source document
        path: PathBuf,
        /// Parser message
        message: String,
    },
}

/// Errors that can occur while translating one language job
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered with a different number of lines than requested
    #[error("Mismatched translation count: expected {expected}, got {actual}")]
    CountMismatch {
        /// Number of texts sent
        expected: usize,
        /// Number of translated lines received
        actual: usize,
    },

    /// A translated line carries an ordinal that does not match its position
    #[error("Translation order mismatch at line {position}: found ordinal {found}")]
    OrderMismatch {
        /// 1-based line position in the reply
        position: usize,
        /// Ordinal found on that line
        found: usize,
    },

    /// The provider answered with no text at all
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Errors raised when a translated value cannot be tied back to its key
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReconcileError {
    /// The (language, resource file, source text) triple has no registered key
    #[error("No key registered for '{source_text}' in {resource_file} ({language})")]
    KeyNotFoundInIndex {
        /// Target language code
        language: String,
        /// Resource file the entry was read from
        resource_file: String,
        /// Key carried by the job entry
        key: String,
        /// Source text of the entry
        source_text: String,
    },
}

/// Errors raised while merging into one output document
#[derive(Error, Debug)]
pub enum MergeError {
    /// The existing output document could not be loaded
    #[error("Failed to load {}: {message}", path.display())]
    Load {
        /// Output document path
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// The updated document could not be written
    #[error("Failed to save {}: {message}", path.display())]
    Persist {
        /// Output document path
        path: PathBuf,
        /// Underlying cause
        message: String,
    },
}

/// Errors raised by the build manifest patcher
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist
    #[error("Build manifest not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The manifest could not be parsed
    #[error("Failed to parse build manifest: {0}")]
    Parse(String),

    /// The manifest could not be written back
    #[error("Failed to save build manifest: {0}")]
    Persist(String),
}
