//! The per-format encoding step.
//!
//! [`Encoder`] is the seam between the batch converter and whatever actually
//! produces bytes. [`NativeEncoder`] decodes with the `image` crate and hands
//! the raster to [`super::formats`].

use tracing::debug;

use crate::core::{BlobRegistry, ConverterSettings, SourceFile};
use crate::processing::formats::encode_as;
use crate::utils::{ConvertError, TargetFormat, output_filename};

/// Bytes produced for one (source, format) pair, before they join a session.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub format: TargetFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Converts one source into one target format.
///
/// Implementations run on the blocking pool, one call at a time.
pub trait Encoder: Send + Sync {
    fn encode(&self, source: &SourceFile, format: TargetFormat) -> Result<EncodedImage, ConvertError>;
}

/// Encoder backed by the `image` codecs.
pub struct NativeEncoder {
    registry: BlobRegistry,
    settings: ConverterSettings,
}

impl NativeEncoder {
    pub fn new(registry: BlobRegistry, settings: ConverterSettings) -> Self {
        Self { registry, settings }
    }

    /// Whether this host can produce `format` at all.
    pub fn supports(&self, format: TargetFormat) -> bool {
        if self.settings.disabled_formats.contains(&format) {
            return false;
        }
        format != TargetFormat::Avif || cfg!(feature = "avif")
    }
}

impl Encoder for NativeEncoder {
    fn encode(&self, source: &SourceFile, format: TargetFormat) -> Result<EncodedImage, ConvertError> {
        if !self.supports(format) {
            return Err(ConvertError::unsupported(format));
        }

        // The decode handle lives only for this block and is revoked on every exit path.
        let raster = {
            let decode_handle = self.registry.create(source.shared_bytes());
            image::load_from_memory(decode_handle.bytes())
                .map_err(|e| ConvertError::decode(source.name(), e))?
                .to_rgba8()
        };

        debug!(
            "Decoded '{}': {}×{}, encoding as {}",
            source.name(),
            raster.width(),
            raster.height(),
            format
        );

        let bytes = encode_as(&raster, format, &self.settings.quality, self.settings.avif_speed)?;

        Ok(EncodedImage {
            format,
            filename: output_filename(source.name(), format),
            bytes,
        })
    }
}
