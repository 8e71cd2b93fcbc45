//! Command handlers for the download selection.

use tracing::debug;

use crate::core::{AppState, HandleId};
use crate::utils::{ConverterResult, TargetFormat};

/// Flips one artifact, addressed by its `blob:` url.
///
/// # Returns
/// Whether the artifact is selected afterwards; `false` for unknown artifacts.
pub async fn toggle_artifact(state: &AppState, url: &str) -> ConverterResult<bool> {
    let id: HandleId = url.parse()?;
    let mut session = state.session().lock().await;
    if !session.toggle(id) {
        debug!("Ignoring toggle for unknown artifact {}", url);
    }
    Ok(session.is_selected(id))
}

/// Toggles the whole column of `format`.
///
/// # Returns
/// Whether the column is fully selected afterwards.
pub async fn toggle_format(state: &AppState, format: TargetFormat) -> bool {
    let mut session = state.session().lock().await;
    session.toggle_format_column(format);
    session.is_format_selected(format)
}

/// Selects the whole column of `format`, leaving it alone if it is already fully selected.
///
/// # Returns
/// Whether the column is fully selected afterwards; `false` when it has no artifacts.
pub async fn select_format(state: &AppState, format: TargetFormat) -> bool {
    let mut session = state.session().lock().await;
    if !session.is_format_selected(format) {
        session.toggle_format_column(format);
    }
    session.is_format_selected(format)
}

/// Selects everything, or clears the selection if everything is selected.
///
/// # Returns
/// The number of selected artifacts afterwards.
pub async fn toggle_all(state: &AppState) -> usize {
    let mut session = state.session().lock().await;
    session.toggle_all();
    session.selection().len()
}
