//! Plain-text document collaborator.
//!
//! Paragraphs are separated by one or more blank lines. Corrections are kept
//! in memory until [`TextDocument::save`] writes the file back.

use crate::error::{CliError, Result};
use scrivener_domain::traits::DocumentSource;
use scrivener_domain::{CorrectableUnit, UnitId};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Section name of every unit of a plain-text document.
const SECTION: &str = "body";

/// A plain-text file split into paragraphs.
#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    paragraphs: Vec<String>,
    modified: bool,
}

impl TextDocument {
    /// Read a document from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::Document(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(Self::from_text(path, &text))
    }

    /// Build a document from text already in memory.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self {
            path: path.into(),
            paragraphs: split_paragraphs(text),
            modified: false,
        }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current paragraphs, corrections included.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Whether any correction has been applied.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Path of the backup copy (`<file>.bak`).
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Render the paragraphs back to text.
    pub fn render(&self) -> String {
        if self.paragraphs.is_empty() {
            return String::new();
        }
        let mut text = self.paragraphs.join("\n\n");
        text.push('\n');
        text
    }

    /// Write the document back to its file.
    ///
    /// With `backup`, the file on disk is first copied to
    /// [`backup_path`](Self::backup_path). Returns the backup path when one
    /// was written.
    pub fn save(&self, backup: bool) -> Result<Option<PathBuf>> {
        let backup_path = if backup {
            let backup_path = self.backup_path();
            fs::copy(&self.path, &backup_path).map_err(|e| {
                CliError::Document(format!(
                    "Failed to create backup {}: {}",
                    backup_path.display(),
                    e
                ))
            })?;
            Some(backup_path)
        } else {
            None
        };

        fs::write(&self.path, self.render()).map_err(|e| {
            CliError::Document(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        Ok(backup_path)
    }
}

impl DocumentSource for TextDocument {
    type Error = CliError;

    fn list_correctable_units(&self) -> Result<Vec<CorrectableUnit>> {
        Ok(self
            .paragraphs
            .iter()
            .enumerate()
            .map(|(i, text)| CorrectableUnit::new(UnitId::new(SECTION, i), i as u64, text.clone()))
            .collect())
    }

    fn apply_correction(&mut self, unit_id: &UnitId, new_text: &str) -> Result<()> {
        if unit_id.section != SECTION {
            return Err(CliError::Document(format!("Unknown unit {}", unit_id)));
        }
        let paragraph = self
            .paragraphs
            .get_mut(unit_id.index)
            .ok_or_else(|| CliError::Document(format!("Unknown unit {}", unit_id)))?;
        *paragraph = new_text.to_string();
        self.modified = true;
        Ok(())
    }
}

/// Split text into paragraphs on blank lines.
///
/// Lines inside a paragraph keep their line breaks; `\r\n` endings are
/// normalized to `\n`.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}
