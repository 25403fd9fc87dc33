use anyhow::{Result, Context, anyhow};
use log::{error, info};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

/// Outcome of a localized-file cleanup
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Files that were removed
    pub deleted: Vec<PathBuf>,
    /// Files that matched but could not be removed
    pub failed: Vec<PathBuf>,
}

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Path of the neutral resource document
    pub fn source_path<P: AsRef<Path>>(resource_dir: P, resource_file: &str, extension: &str) -> PathBuf {
        resource_dir.as_ref().join(format!("{}.{}", resource_file, extension))
    }

    // @generates: Output path for a translated resource document
    // @params: resource_dir, resource_file, language_code, extension
    pub fn generate_output_path<P: AsRef<Path>>(
        resource_dir: P,
        resource_file: &str,
        language_code: &str,
        extension: &str,
    ) -> PathBuf {
        let mut output_filename = resource_file.to_string();
        output_filename.push('.');
        output_filename.push_str(language_code);
        output_filename.push('.');
        output_filename.push_str(extension);

        resource_dir.as_ref().join(output_filename)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Replace a file's content through a temporary file in the same directory,
    /// so readers never observe a half-written document
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.flush()?;
        temp.persist(path)
            .map_err(|e| anyhow!("Failed to replace {:?}: {}", path, e.error))?;

        Ok(())
    }

    /// Find the localized variants `{base}.*.{extension}` of a resource document.
    /// The neutral `{base}.{extension}` is never returned.
    pub fn find_localized_files<P: AsRef<Path>>(dir: P, base: &str, extension: &str) -> Result<Vec<PathBuf>> {
        let pattern = Regex::new(&format!(
            r"^{}\..+\.{}$",
            regex::escape(base),
            regex::escape(extension)
        ))?;

        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if pattern.is_match(&file_name) {
                result.push(entry.path().to_path_buf());
            }
        }
        result.sort();

        Ok(result)
    }

    /// Delete every localized variant of a resource document
    pub fn delete_localized_files<P: AsRef<Path>>(dir: P, base: &str, extension: &str) -> Result<CleanupReport> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("The specified directory {:?} does not exist", dir));
        }

        let mut report = CleanupReport::default();
        for path in Self::find_localized_files(dir, base, extension)? {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!("Deleted: {:?}", path);
                    report.deleted.push(path);
                }
                Err(e) => {
                    error!("Error deleting file {:?}: {}", path, e);
                    report.failed.push(path);
                }
            }
        }

        Ok(report)
    }
}
