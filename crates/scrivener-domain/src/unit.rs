//! Correctable unit - one addressable span of document text

use std::fmt;

/// Identifier of a unit inside its document
///
/// The `section` names the document part the text was read from
/// (`body`, `header`, `footnote`, ...) and `index` is its position
/// within that part.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    /// Document part the unit belongs to
    pub section: String,

    /// Position within the part (paragraph index)
    pub index: usize,
}

impl UnitId {
    /// Create a new unit identifier
    pub fn new(section: impl Into<String>, index: usize) -> Self {
        Self {
            section: section.into(),
            index,
        }
    }

    /// Identifier for a paragraph of the main body
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::UnitId;
    ///
    /// let id = UnitId::body(3);
    /// assert_eq!(id.to_string(), "body#3");
    /// ```
    pub fn body(index: usize) -> Self {
        Self::new("body", index)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.section, self.index)
    }
}

/// A unit of text eligible for correction
///
/// Units are immutable once read from the source document. The pipeline
/// consumes each unit exactly once; corrected text is reported through a
/// [`CorrectionOutcome`](crate::CorrectionOutcome), never written back into
/// the unit itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectableUnit {
    id: UnitId,
    order: u64,
    text: String,
}

impl CorrectableUnit {
    /// Create a new unit
    pub fn new(id: UnitId, order: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            order,
            text: text.into(),
        }
    }

    /// Identifier of the unit in its document
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Ordering key (document order)
    pub fn order(&self) -> u64 {
        self.order
    }

    /// The text of the unit
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the unit is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
