//! Per-format encoding on top of the `image` codecs and libwebp.
//!
//! Every function takes the decoded raster at native size and returns the
//! encoded bytes. Formats without alpha are flattened onto white first.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};

use crate::core::QualitySettings;
use crate::utils::{ConvertError, TargetFormat};

type Result<T> = std::result::Result<T, ConvertError>;

/// Composites `image` over an opaque white background.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Encodes an opaque raster as baseline JPEG. Also used for JFIF, which only differs by extension.
pub fn save_jpeg(image: &RgbImage, quality: u8, format: TargetFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ConvertError::encode(format, e))?;
    Ok(buf)
}

/// Encodes as lossless PNG, alpha preserved.
pub fn save_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .map_err(|e| ConvertError::encode(TargetFormat::Png, e))?;
    Ok(buf)
}

/// Encodes as lossy WebP through libwebp, alpha preserved.
pub fn save_webp(image: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    let encoded = webp::Encoder::from_rgba(image.as_raw(), image.width(), image.height())
        .encode_simple(false, f32::from(quality))
        .map_err(|e| ConvertError::encode(TargetFormat::Webp, format!("{e:?}")))?;
    Ok(encoded.to_vec())
}

/// Encodes as AVIF (AV1 still image) through ravif.
#[cfg(feature = "avif")]
pub fn save_avif(image: &RgbaImage, quality: u8, speed: u8) -> Result<Vec<u8>> {
    use image::codecs::avif::AvifEncoder;

    let mut buf = Vec::new();
    AvifEncoder::new_with_speed_quality(&mut buf, speed, quality)
        .write_image(image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
        .map_err(|e| ConvertError::encode(TargetFormat::Avif, e))?;
    Ok(buf)
}

#[cfg(not(feature = "avif"))]
pub fn save_avif(_image: &RgbaImage, _quality: u8, _speed: u8) -> Result<Vec<u8>> {
    Err(ConvertError::unsupported(TargetFormat::Avif))
}

/// Dispatches to the save function for `format`.
pub fn encode_as(
    image: &RgbaImage,
    format: TargetFormat,
    quality: &QualitySettings,
    avif_speed: u8,
) -> Result<Vec<u8>> {
    let Some(level) = quality.for_format(format) else {
        return save_png(image);
    };
    if !format.supports_alpha() {
        return save_jpeg(&flatten_onto_white(image), level, format);
    }

    match format {
        TargetFormat::Webp => save_webp(image, level),
        TargetFormat::Avif => save_avif(image, level, avif_speed),
        _ => Err(ConvertError::unsupported(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard() -> RgbaImage {
        RgbaImage::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn transparent_pixels_become_white() {
        let flat = flatten_onto_white(&checkerboard());
        assert_eq!(flat.get_pixel(1, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(0, 0).0, [200, 30, 30]);
    }

    #[test]
    fn half_alpha_blends_towards_white() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let [r, g, b] = flatten_onto_white(&image).get_pixel(0, 0).0;
        assert_eq!((r, g, b), (127, 127, 127));
    }

    #[test]
    fn png_roundtrips_pixels() {
        let source = checkerboard();
        let bytes = save_png(&source).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, source);
    }

    fn noise(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            let v = x.wrapping_mul(7919) ^ y.wrapping_mul(104_729) ^ (x * y);
            Rgba([v as u8, (v >> 3) as u8, (v >> 6) as u8, 255])
        })
    }

    #[test]
    fn webp_quality_controls_output() {
        let source = noise(64);
        let low = save_webp(&source, 10).unwrap();
        let high = save_webp(&source, 95).unwrap();

        assert_eq!(&high[..4], b"RIFF");
        assert_eq!(&high[8..12], b"WEBP");
        assert!(low.len() < high.len());

        let decoded = image::load_from_memory(&high).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn webp_uses_configured_quality() {
        let source = noise(32);
        let quality = QualitySettings {
            webp: 20,
            ..QualitySettings::default()
        };
        let via_settings = encode_as(&source, TargetFormat::Webp, &quality, 8).unwrap();
        assert_eq!(via_settings, save_webp(&source, 20).unwrap());
        assert_ne!(via_settings, save_webp(&source, 85).unwrap());
    }

    #[test]
    fn jpeg_and_jfif_share_the_bitstream() {
        let source = checkerboard();
        let jpeg = save_jpeg(&flatten_onto_white(&source), 92, TargetFormat::Jpeg).unwrap();
        let jfif = encode_as(&source, TargetFormat::Jfif, &QualitySettings::default(), 8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(jpeg, jfif);
        assert_eq!(image::guess_format(&jfif).unwrap(), image::ImageFormat::Jpeg);
    }

    #[cfg(feature = "avif")]
    #[test]
    fn avif_has_ftyp_box() {
        let bytes = save_avif(&checkerboard(), 85, 10).unwrap();
        assert_eq!(&bytes[4..8], b"ftyp");
    }
}
