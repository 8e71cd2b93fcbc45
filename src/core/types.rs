//! Core types for conversion settings and results.

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::handle::{BlobRegistry, HandleId, ObjectHandle};
use crate::utils::{ConvertError, FailureKind, TargetFormat, sanitize_filename};

/// Configuration for the converter.
///
/// Deserialized from camelCase JSON; every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterSettings {
    /// Quality for lossy formats
    pub quality: QualitySettings,
    /// AVIF encoder speed (1 slowest/best, 10 fastest)
    pub avif_speed: u8,
    /// Formats this host refuses to produce; they fail as unsupported
    pub disabled_formats: Vec<TargetFormat>,
    /// Select newly converted artifacts as soon as they join the session
    pub auto_select_new: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            quality: QualitySettings::default(),
            avif_speed: 8,
            disabled_formats: Vec::new(),
            auto_select_new: false,
        }
    }
}

/// Quality levels (1-100) for the lossy formats.
///
/// PNG is always lossless. JFIF shares the JPEG setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    pub jpeg: u8,
    pub webp: u8,
    pub avif: u8,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            jpeg: 92,
            webp: 85,
            avif: 85,
        }
    }
}

impl QualitySettings {
    /// Effective quality for `format`, `None` for lossless output
    pub fn for_format(&self, format: TargetFormat) -> Option<u8> {
        match format {
            TargetFormat::Jpeg | TargetFormat::Jfif => Some(self.jpeg),
            TargetFormat::Webp => Some(self.webp),
            TargetFormat::Avif => Some(self.avif),
            TargetFormat::Png => None,
        }
    }
}

/// One user-supplied input image.
///
/// Clones share the preview handle; it is revoked when the last clone drops.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    name: String,
    size: u64,
    preview: Arc<ObjectHandle>,
}

impl SourceFile {
    /// Registers `bytes` as the preview. `name` is reduced to its final path component.
    pub fn new(registry: &BlobRegistry, name: impl AsRef<str>, bytes: Vec<u8>) -> Self {
        let size = bytes.len() as u64;
        Self {
            name: sanitize_filename(name.as_ref()),
            size,
            preview: Arc::new(registry.create(bytes)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bytes(&self) -> &[u8] {
        self.preview.bytes()
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        self.preview.shared_bytes()
    }

    pub fn preview_id(&self) -> HandleId {
        self.preview.id()
    }
}

/// One successful encoding of a source into a target format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub format: TargetFormat,
    #[serde(rename = "url")]
    pub handle: ObjectHandle,
    pub size: u64,
    pub filename: String,
}

impl ConversionResult {
    pub fn id(&self) -> HandleId {
        self.handle.id()
    }

    pub fn bytes(&self) -> &[u8] {
        self.handle.bytes()
    }
}

/// A format that could not be produced for a source.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatFailure {
    pub format: TargetFormat,
    pub kind: FailureKind,
    pub message: String,
}

impl FormatFailure {
    pub fn new(format: TargetFormat, error: &ConvertError) -> Self {
        Self {
            format,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// A source together with everything produced from it.
///
/// Results follow format order; failed formats are absent from `results`
/// and listed in `failures` instead.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub id: Uuid,
    pub source: SourceFile,
    pub results: Vec<ConversionResult>,
    pub failures: Vec<FormatFailure>,
}

impl ProcessedFile {
    pub fn new(source: SourceFile, results: Vec<ConversionResult>, failures: Vec<FormatFailure>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            results,
            failures,
        }
    }

    /// True when the source could not be decoded at all
    pub fn decode_failed(&self) -> bool {
        self.failures.iter().any(|f| f.kind == FailureKind::DecodeFailure)
    }

    pub fn result_for(&self, format: TargetFormat) -> Option<&ConversionResult> {
        self.results.iter().find(|r| r.format == format)
    }
}
