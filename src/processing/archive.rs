//! Zip packing for bulk downloads.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::utils::{ConverterError, ConverterResult};

pub const ARCHIVE_EXTENSION: &str = "zip";

/// A packed selection ready to be offered for download.
#[derive(Debug, Clone)]
pub struct Archive {
    pub name: String,
    pub bytes: Vec<u8>,
    pub entries: usize,
}

/// Download name for an archive created at `epoch_ms`.
pub fn archive_name(epoch_ms: u128) -> String {
    format!("converted_images_{epoch_ms}.{ARCHIVE_EXTENSION}")
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Packs `(filename, bytes)` entries into a flat zip archive.
///
/// Names are stored as given. An empty entry list or a repeated name is an
/// error; uniqueness is the caller's job.
pub fn pack<'a, I>(entries: I) -> ConverterResult<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut names = HashSet::new();

    for (name, bytes) in entries {
        if !names.insert(name) {
            return Err(ConverterError::archive(format!("Duplicate entry: {name}")));
        }
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }

    if names.is_empty() {
        return Err(ConverterError::EmptySelection);
    }

    let bytes = writer.finish()?.into_inner();
    debug!("Packed {} entries into {} bytes", names.len(), bytes.len());
    Ok(bytes)
}

/// Reads every entry of a zip archive back as `(name, bytes)`, in stored order.
pub fn unpack(bytes: &[u8]) -> ConverterResult<Vec<(String, Vec<u8>)>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut contents = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut contents)?;
        entries.push((file.name().to_string(), contents));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_survive_a_roundtrip() {
        let png = vec![0x89, b'P', b'N', b'G', 1, 2, 3];
        let jpg = vec![0xFF, 0xD8, 9, 9, 9];
        let bytes = pack([("cat.png", &png[..]), ("cat.jpg", &jpg[..])]).unwrap();

        let entries = unpack(&bytes).unwrap();
        assert_eq!(
            entries,
            vec![("cat.png".to_string(), png), ("cat.jpg".to_string(), jpg)]
        );
    }

    #[test]
    fn empty_selection_is_rejected() {
        let none: [(&str, &[u8]); 0] = [];
        assert!(matches!(pack(none), Err(ConverterError::EmptySelection)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = pack([("a.png", &b"1"[..]), ("a.png", &b"2"[..])]).unwrap_err();
        assert!(matches!(err, ConverterError::Archive(_)));
    }

    #[test]
    fn name_carries_timestamp() {
        assert_eq!(archive_name(1700000000123), "converted_images_1700000000123.zip");
        assert!(epoch_millis() > 0);
    }
}
