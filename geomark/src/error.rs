//! Error types used by the crate.

use geomark_types::GeometryKind;
use thiserror::Error;

/// Failure to encode a single geometry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// Geometry contains NaN or infinite coordinates.
    #[error("geometry contains a non-finite coordinate")]
    NonFiniteCoordinate,
    /// Geometry kind the encoder does not know how to write.
    #[error("unsupported geometry kind: {0}")]
    UnsupportedGeometryKind(String),
    /// Name cannot be used as an XML element name.
    #[error("'{0}' is not a valid element name")]
    InvalidName(String),
    /// Underlying markup writer failed.
    #[error("failed to write markup: {0}")]
    Write(String),
}

impl EncodeError {
    pub(crate) fn unsupported(kind: GeometryKind) -> Self {
        Self::UnsupportedGeometryKind(kind.to_string())
    }

    pub(crate) fn write(error: impl std::fmt::Display) -> Self {
        Self::Write(error.to_string())
    }
}

/// Failure of the feature source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The source could not be opened.
    #[error("failed to open feature source: {0}")]
    Open(String),
    /// Reading the next feature failed.
    #[error("failed to read feature: {0}")]
    Read(String),
}

/// Failure to produce a label or description text for a feature.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to build label: {0}")]
pub struct LabelError(pub String);

/// Error that aborts a whole rendering call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Feature source failed. The source is released before this error is returned.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Document level markup could not be written.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// Rendering was cancelled by the abort check between features.
    #[error("rendering aborted")]
    Aborted,
}
