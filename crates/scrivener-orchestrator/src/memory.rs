//! In-memory document

use scrivener_domain::traits::DocumentSource;
use scrivener_domain::{CorrectableUnit, UnitId};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by [`MemoryDocument`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryDocumentError {
    /// The document was configured to fail on load
    #[error("Document unavailable")]
    Unavailable,

    /// No unit with this identifier
    #[error("Unknown unit: {0}")]
    UnknownUnit(UnitId),
}

/// Document held entirely in memory
///
/// Paragraph `i` of the body becomes unit `body#i`. Used by tests and by
/// callers that already hold their text in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    units: Vec<CorrectableUnit>,
    corrections: HashMap<UnitId, String>,
    unavailable: bool,
}

impl MemoryDocument {
    /// Create a document from body paragraphs
    pub fn new<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let units = paragraphs
            .into_iter()
            .enumerate()
            .map(|(i, text)| CorrectableUnit::new(UnitId::body(i), i as u64, text))
            .collect();
        Self {
            units,
            ..Default::default()
        }
    }

    /// Document whose every read fails
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    /// Corrections written so far
    pub fn corrections(&self) -> &HashMap<UnitId, String> {
        &self.corrections
    }

    /// Current text of every unit, corrections applied
    pub fn paragraphs(&self) -> Vec<String> {
        self.units
            .iter()
            .map(|u| {
                self.corrections
                    .get(u.id())
                    .cloned()
                    .unwrap_or_else(|| u.text().to_string())
            })
            .collect()
    }
}

impl DocumentSource for MemoryDocument {
    type Error = MemoryDocumentError;

    fn list_correctable_units(&self) -> Result<Vec<CorrectableUnit>, Self::Error> {
        if self.unavailable {
            return Err(MemoryDocumentError::Unavailable);
        }
        Ok(self.units.clone())
    }

    fn apply_correction(&mut self, unit_id: &UnitId, new_text: &str) -> Result<(), Self::Error> {
        if !self.units.iter().any(|u| u.id() == unit_id) {
            return Err(MemoryDocumentError::UnknownUnit(unit_id.clone()));
        }
        self.corrections.insert(unit_id.clone(), new_text.to_string());
        Ok(())
    }
}
