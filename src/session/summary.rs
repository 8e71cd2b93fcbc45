use serde::Serialize;
use uuid::Uuid;

use crate::core::{FormatFailure, HandleId};
use crate::session::Session;
use crate::utils::{TargetFormat, format_bytes};

/// Snapshot of a session for rendering or printing as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub files: Vec<FileSummary>,
    pub total_artifacts: usize,
    pub selected_artifacts: usize,
    pub selected_size: String,
    /// Formats whose whole column is selected
    pub selected_formats: Vec<TargetFormat>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: Uuid,
    pub source_name: String,
    pub source_size: String,
    pub preview_url: HandleId,
    pub artifacts: Vec<ArtifactSummary>,
    pub failures: Vec<FormatFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub format: TargetFormat,
    pub mime_type: &'static str,
    pub url: HandleId,
    pub filename: String,
    pub size: String,
    pub selected: bool,
}

impl SessionSummary {
    pub fn from_session(session: &Session) -> Self {
        let files = session
            .files()
            .iter()
            .map(|file| FileSummary {
                id: file.id,
                source_name: file.source.name().to_string(),
                source_size: format_bytes(file.source.size(), 2),
                preview_url: file.source.preview_id(),
                artifacts: file
                    .results
                    .iter()
                    .map(|r| ArtifactSummary {
                        format: r.format,
                        mime_type: r.format.mime_type(),
                        url: r.id(),
                        filename: r.filename.clone(),
                        size: format_bytes(r.size, 2),
                        selected: session.is_selected(r.id()),
                    })
                    .collect(),
                failures: file.failures.clone(),
            })
            .collect();

        Self {
            files,
            total_artifacts: session.artifact_count(),
            selected_artifacts: session.selection().len(),
            selected_size: format_bytes(session.selected_bytes(), 2),
            selected_formats: TargetFormat::all()
                .iter()
                .copied()
                .filter(|f| session.is_format_selected(*f))
                .collect(),
        }
    }
}
