use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::core::{BlobRegistry, SourceFile};
use crate::utils::ConverterResult;

/// Returns the last component of `path`, splitting on both `/` and `\`.
pub fn extract_filename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Reduces a caller-supplied name to a bare file name that cannot leave an output directory.
pub fn sanitize_filename(name: &str) -> String {
    match extract_filename(name.trim()) {
        "" | "." | ".." => "image".to_string(),
        base => base.to_string(),
    }
}

/// Reads a source image from disk and registers its bytes as a preview handle.
pub async fn read_source(registry: &BlobRegistry, path: impl AsRef<Path>) -> ConverterResult<SourceFile> {
    let path = path.as_ref();
    let bytes = fs::read(path).await?;
    let name = extract_filename(&path.to_string_lossy()).to_string();
    debug!("Read '{}' ({} bytes)", name, bytes.len());
    Ok(SourceFile::new(registry, name, bytes))
}

/// Writes `bytes` to `dir/name`, creating `dir` if needed.
pub async fn write_output(dir: impl AsRef<Path>, name: &str, bytes: &[u8]) -> ConverterResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    fs::write(&path, bytes).await?;
    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
