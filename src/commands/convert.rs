//! Command handlers for converting and managing images.

use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{AppState, BatchProgress, SourceFile};
use crate::session::SessionSummary;
use crate::utils::{ConverterResult, read_source, validate_inputs};

/// Converts the image files at `paths` and appends them to the session.
///
/// Every path is validated before any work starts. `on_progress` receives one
/// update per completed file.
///
/// # Returns
/// The ids of the new processed files, in input order.
pub async fn convert_images<F>(
    state: &AppState,
    paths: Vec<PathBuf>,
    on_progress: F,
) -> ConverterResult<Vec<Uuid>>
where
    F: FnMut(&BatchProgress),
{
    debug!("Received convert_images command for {} files", paths.len());
    validate_inputs(&paths)?;

    let mut sources = Vec::with_capacity(paths.len());
    for path in &paths {
        sources.push(read_source(state.registry(), path).await?);
    }

    convert_sources(state, sources, on_progress).await
}

/// Converts in-memory `(name, bytes)` inputs and appends them to the session.
pub async fn convert_bytes<F>(
    state: &AppState,
    inputs: Vec<(String, Vec<u8>)>,
    on_progress: F,
) -> ConverterResult<Vec<Uuid>>
where
    F: FnMut(&BatchProgress),
{
    debug!("Received convert_bytes command for {} inputs", inputs.len());
    let sources = inputs
        .into_iter()
        .map(|(name, bytes)| SourceFile::new(state.registry(), name, bytes))
        .collect();

    convert_sources(state, sources, on_progress).await
}

async fn convert_sources<F>(
    state: &AppState,
    sources: Vec<SourceFile>,
    mut on_progress: F,
) -> ConverterResult<Vec<Uuid>>
where
    F: FnMut(&BatchProgress),
{
    let progress = state.progress().clone();
    progress.begin(sources.len());

    let converter = state.create_converter();
    let converted = converter
        .convert_batch(sources, |update| {
            on_progress(&update);
            progress.record(update);
        })
        .await;
    progress.finish();

    let files = converted?;
    let ids: Vec<Uuid> = files.iter().map(|f| f.id).collect();
    state.session().lock().await.add_files(files);

    info!("Added {} files to the session", ids.len());
    Ok(ids)
}

/// Removes one processed file and everything derived from it.
///
/// # Returns
/// The number of artifacts removed.
pub async fn remove_file(state: &AppState, id: Uuid) -> ConverterResult<usize> {
    state.session().lock().await.remove(id)
}

/// Removes every processed file.
pub async fn clear_session(state: &AppState) {
    state.session().lock().await.clear_all();
}

/// Snapshot of the session for display.
pub async fn session_summary(state: &AppState) -> SessionSummary {
    state.session().lock().await.summary()
}
