//! Per-feature problems that did not abort rendering, and the documents that carry them.

use std::fmt::{Display, Formatter};

/// Step of the feature encoding that failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiagnosticStage {
    /// Attribute element was skipped.
    Attribute,
    /// Geometry body was skipped.
    Geometry,
    /// Placemark name was not written.
    Name,
    /// Placemark description was not written.
    Description,
}

/// A recoverable problem with a single feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Id of the feature.
    pub feature_id: String,
    /// Failed step.
    pub stage: DiagnosticStage,
    /// Error message.
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn new(
        feature_id: &str,
        stage: DiagnosticStage,
        error: impl std::error::Error,
    ) -> Self {
        let diagnostic = Self {
            feature_id: feature_id.to_string(),
            stage,
            message: error.to_string(),
        };
        log::warn!("{diagnostic}");

        diagnostic
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "feature {}: {:?} skipped: {}",
            self.feature_id, self.stage, self.message
        )
    }
}

/// Output of a rendering call.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDocument {
    /// Complete markup of the document.
    pub markup: String,
    /// Problems with single features that were skipped or partially written.
    pub diagnostics: Vec<Diagnostic>,
}
