use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::{ConverterError, ValidationError};

/// Output formats every source image is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpeg,
    Png,
    Webp,
    Avif,
    Jfif,
}

/// Every target format in conversion order.
pub const ALL_FORMATS: [TargetFormat; 5] = [
    TargetFormat::Jpeg,
    TargetFormat::Png,
    TargetFormat::Webp,
    TargetFormat::Avif,
    TargetFormat::Jfif,
];

impl TargetFormat {
    /// All formats in the fixed conversion order
    pub fn all() -> &'static [TargetFormat] {
        &ALL_FORMATS
    }

    /// Lowercase tag used in settings, logs and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
            Self::Jfif => "jfif",
        }
    }

    /// Extension given to converted files
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Avif => "avif",
            // JFIF is a JPEG bitstream, only the extension differs
            Self::Jfif => "jfif",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg | Self::Jfif => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Avif => "image/avif",
        }
    }

    /// Whether the format can carry an alpha channel.
    ///
    /// Formats without alpha are composited onto white before encoding.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg | Self::Jfif)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "avif" => Ok(Self::Avif),
            "jfif" => Ok(Self::Jfif),
            _ => Err(ValidationError::settings(format!("Unsupported target format: {s}")).into()),
        }
    }
}

/// Builds the output file name: the source name without its last extension,
/// followed by the target extension.
///
/// Names without an extension (or dot-files like `.hidden`) keep the full name
/// as the stem.
pub fn output_filename(source_name: &str, format: TargetFormat) -> String {
    let stem = match source_name.rfind('.') {
        Some(idx) if idx > 0 => &source_name[..idx],
        _ => source_name,
    };
    format!("{stem}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_fixed() {
        let tags: Vec<_> = TargetFormat::all().iter().map(|f| f.as_str()).collect();
        assert_eq!(tags, ["jpeg", "png", "webp", "avif", "jfif"]);
    }

    #[test]
    fn jfif_is_jpeg_with_its_own_extension() {
        assert_eq!(TargetFormat::Jfif.mime_type(), TargetFormat::Jpeg.mime_type());
        assert_eq!(TargetFormat::Jfif.extension(), "jfif");
        assert_eq!(TargetFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("JPG".parse::<TargetFormat>().unwrap(), TargetFormat::Jpeg);
        assert_eq!(" webp ".parse::<TargetFormat>().unwrap(), TargetFormat::Webp);
        assert!("tiff".parse::<TargetFormat>().is_err());
    }

    #[test]
    fn filename_strips_last_extension_only() {
        assert_eq!(output_filename("holiday.png", TargetFormat::Webp), "holiday.webp");
        assert_eq!(output_filename("archive.tar.png", TargetFormat::Jpeg), "archive.tar.jpg");
        assert_eq!(output_filename("README", TargetFormat::Png), "README.png");
        assert_eq!(output_filename(".hidden", TargetFormat::Avif), ".hidden.avif");
    }
}
