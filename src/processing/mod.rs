//! Image conversion and packing.
//!
//! - [`encoder`]: the per-format encode step and its `image`-backed implementation.
//! - [`formats`]: format-specific encode functions.
//! - [`converter`]: sequential batch conversion with progress reporting.
//! - [`archive`]: zip packing for bulk downloads.

pub mod archive;
pub mod converter;
pub mod encoder;
pub mod formats;

pub use archive::{Archive, archive_name, epoch_millis, pack, unpack};
pub use converter::BatchConverter;
pub use encoder::{EncodedImage, Encoder, NativeEncoder};
