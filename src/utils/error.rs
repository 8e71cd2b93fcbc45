//! Error types for the image converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! [`ConvertError`] covers a single (file, format) conversion attempt and is always
//! contained by the converter; [`ConverterError`] is what commands return.

use std::io;
use std::path::PathBuf;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::utils::TargetFormat;

/// Failure of one conversion attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConvertError {
    /// The source bytes are not a decodable image
    #[error("Failed to decode '{name}': {reason}")]
    DecodeFailure { name: String, reason: String },

    /// The host cannot produce the requested format
    #[error("Encoding to {format} is not supported on this host")]
    EncodingUnsupported { format: TargetFormat },

    /// The encoder accepted the format but failed to produce output
    #[error("Encoding to {format} failed: {reason}")]
    Encode { format: TargetFormat, reason: String },
}

/// Discriminant of [`ConvertError`], recorded alongside failed formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    DecodeFailure,
    EncodingUnsupported,
    Encode,
}

impl ConvertError {
    pub fn decode<N: Into<String>, R: ToString>(name: N, reason: R) -> Self {
        Self::DecodeFailure {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported(format: TargetFormat) -> Self {
        Self::EncodingUnsupported { format }
    }

    pub fn encode<R: ToString>(format: TargetFormat, reason: R) -> Self {
        Self::Encode {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DecodeFailure { .. } => FailureKind::DecodeFailure,
            Self::EncodingUnsupported { .. } => FailureKind::EncodingUnsupported,
            Self::Encode { .. } => FailureKind::Encode,
        }
    }
}

/// Validation errors for inputs and settings.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
    /// A string that is not a `blob:<uuid>` reference
    #[error("Invalid handle: {0}")]
    Handle(String),
    /// A batch was submitted without files
    #[error("No input files provided")]
    EmptyBatch,
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// IO error accessing the path
    #[error("IO error: {0}")]
    IO(String),
}

/// Main error type for the converter.
///
/// Everything a command can fail with is converted to this type before being
/// returned to the caller.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Input or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A conversion failed outside the per-format containment
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConvertError),

    /// Building the zip archive failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// Download requested with nothing selected
    #[error("Nothing is selected")]
    EmptySelection,

    /// No processed file with this id exists in the session
    #[error("Unknown file: {0}")]
    UnknownFile(Uuid),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn archive<T: Into<String>>(msg: T) -> Self {
        Self::Archive(msg.into())
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<PathError> for ConverterError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<zip::result::ZipError> for ConverterError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ConvertError::decode("a.png", "bad header").kind(), FailureKind::DecodeFailure);
        assert_eq!(
            ConvertError::unsupported(TargetFormat::Avif).kind(),
            FailureKind::EncodingUnsupported
        );
        assert_eq!(ConvertError::encode(TargetFormat::Png, "oops").kind(), FailureKind::Encode);
    }

    #[test]
    fn messages_name_the_format() {
        let err = ConvertError::unsupported(TargetFormat::Avif);
        assert_eq!(err.to_string(), "Encoding to avif is not supported on this host");

        let err: ConverterError = ConvertError::decode("cat.png", "invalid signature").into();
        assert_eq!(
            err.to_string(),
            "Conversion error: Failed to decode 'cat.png': invalid signature"
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(ConvertError::unsupported(TargetFormat::Avif)).unwrap();
        assert_eq!(json["kind"], "encodingUnsupported");
        assert_eq!(json["format"], "avif");
    }
}
