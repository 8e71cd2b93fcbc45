//! Command handlers that write artifacts out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::AppState;
use crate::utils::{ConverterResult, write_output};

/// Packs the selection into `converted_images_<epoch-ms>.zip` inside `out_dir`.
///
/// # Returns
/// The archive path, or `None` when nothing is selected.
pub async fn download_archive(state: &AppState, out_dir: impl AsRef<Path>) -> ConverterResult<Option<PathBuf>> {
    let archive = state.session().lock().await.download_archive()?;
    let Some(archive) = archive else {
        debug!("Nothing selected, skipping archive download");
        return Ok(None);
    };

    let path = write_output(out_dir, &archive.name, &archive.bytes).await?;
    info!("Saved {} ({} entries)", path.display(), archive.entries);
    Ok(Some(path))
}

/// Writes every selected artifact as its own file inside `out_dir`.
///
/// # Returns
/// The written paths in natural selection order.
pub async fn export_selected(state: &AppState, out_dir: impl AsRef<Path>) -> ConverterResult<Vec<PathBuf>> {
    let selected: Vec<(String, Arc<[u8]>)> = {
        let session = state.session().lock().await;
        session
            .selected_results()
            .into_iter()
            .map(|r| (r.filename.clone(), r.handle.shared_bytes()))
            .collect()
    };

    let out_dir = out_dir.as_ref();
    let mut written = Vec::with_capacity(selected.len());
    for (name, bytes) in &selected {
        written.push(write_output(out_dir, name, bytes).await?);
    }

    info!("Exported {} artifacts to {}", written.len(), out_dir.display());
    Ok(written)
}
