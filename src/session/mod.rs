//! Working set of processed files and the download selection.
//!
//! [`Session`] is a plain state object: every operation is a method that
//! leaves the selection containing only artifacts owned by a live file.
//! Removing a file drops it, which revokes its preview and artifact handles.

mod naming;
mod summary;

use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{ConversionResult, HandleId, ProcessedFile};
use crate::processing::{Archive, archive_name, epoch_millis, pack};
use crate::utils::{ConverterError, ConverterResult, TargetFormat};

pub use naming::unique_filename;
pub use summary::{ArtifactSummary, FileSummary, SessionSummary};

#[derive(Debug, Default)]
pub struct Session {
    files: Vec<ProcessedFile>,
    selected: HashSet<HandleId>,
    auto_select_new: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that selects artifacts as soon as they are added.
    pub fn with_auto_select(auto_select_new: bool) -> Self {
        Self {
            auto_select_new,
            ..Self::default()
        }
    }

    pub fn files(&self) -> &[ProcessedFile] {
        &self.files
    }

    pub fn file(&self, id: Uuid) -> Option<&ProcessedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn selection(&self) -> &HashSet<HandleId> {
        &self.selected
    }

    pub fn is_selected(&self, id: HandleId) -> bool {
        self.selected.contains(&id)
    }

    /// Every artifact of every file, in file order then format order.
    pub fn artifacts(&self) -> impl Iterator<Item = &ConversionResult> {
        self.files.iter().flat_map(|f| f.results.iter())
    }

    pub fn artifact_count(&self) -> usize {
        self.files.iter().map(|f| f.results.len()).sum()
    }

    fn artifacts_of(&self, format: TargetFormat) -> impl Iterator<Item = &ConversionResult> {
        self.artifacts().filter(move |r| r.format == format)
    }

    fn is_reachable(&self, id: HandleId) -> bool {
        self.artifacts().any(|r| r.id() == id)
    }

    /// Appends a converted batch, keeping every artifact filename unique.
    pub fn add_files(&mut self, files: Vec<ProcessedFile>) {
        let mut taken: HashSet<String> = self.artifacts().map(|r| r.filename.clone()).collect();

        for mut file in files {
            for result in &mut file.results {
                let unique = unique_filename(&result.filename, &taken);
                if unique != result.filename {
                    debug!("Renamed '{}' to '{}' to avoid a collision", result.filename, unique);
                    result.filename = unique;
                }
                taken.insert(result.filename.clone());

                if self.auto_select_new {
                    self.selected.insert(result.id());
                }
            }
            self.files.push(file);
        }

        debug!("Session holds {} files, {} artifacts", self.files.len(), self.artifact_count());
    }

    /// Flips the selection of one artifact. Returns `false` for unknown ids.
    pub fn toggle(&mut self, id: HandleId) -> bool {
        if !self.is_reachable(id) {
            return false;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        true
    }

    /// True when the format has artifacts and all of them are selected.
    pub fn is_format_selected(&self, format: TargetFormat) -> bool {
        let mut column = self.artifacts_of(format).peekable();
        column.peek().is_some() && column.all(|r| self.selected.contains(&r.id()))
    }

    /// Selects the whole format column, or deselects it if it is already fully selected.
    pub fn toggle_format_column(&mut self, format: TargetFormat) {
        let column: Vec<HandleId> = self.artifacts_of(format).map(|r| r.id()).collect();
        if column.is_empty() {
            return;
        }

        let all_selected = column.iter().all(|id| self.selected.contains(id));
        for id in column {
            if all_selected {
                self.selected.remove(&id);
            } else {
                self.selected.insert(id);
            }
        }
    }

    /// Clears the selection if everything is selected, otherwise selects everything.
    pub fn toggle_all(&mut self) {
        if self.selected.len() == self.artifact_count() {
            self.selected.clear();
        } else {
            self.selected = self.artifacts().map(|r| r.id()).collect();
        }
    }

    /// Removes a file, prunes its artifacts from the selection and revokes its handles.
    ///
    /// Returns how many artifacts were removed with it.
    pub fn remove(&mut self, id: Uuid) -> ConverterResult<usize> {
        let idx = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or(ConverterError::UnknownFile(id))?;

        let file = self.files.remove(idx);
        for result in &file.results {
            self.selected.remove(&result.id());
        }
        let removed = file.results.len();
        debug!("Removed '{}' and {} artifacts", file.source.name(), removed);
        Ok(removed)
    }

    /// Drops every file and handle and empties the selection.
    pub fn clear_all(&mut self) {
        let count = self.files.len();
        self.selected.clear();
        self.files.clear();
        info!("Session cleared ({} files)", count);
    }

    /// Selected artifacts in natural order (file order, then format order).
    pub fn selected_results(&self) -> Vec<&ConversionResult> {
        self.artifacts().filter(|r| self.selected.contains(&r.id())).collect()
    }

    /// Total encoded size of the current selection
    pub fn selected_bytes(&self) -> u64 {
        self.selected_results().iter().map(|r| r.size).sum()
    }

    /// Packs the selection into an archive named for the current time.
    ///
    /// An empty selection is a no-op and yields `Ok(None)`.
    pub fn download_archive(&self) -> ConverterResult<Option<Archive>> {
        self.build_archive(epoch_millis())
    }

    /// Packs the selection into an archive named for `epoch_ms`.
    pub fn build_archive(&self, epoch_ms: u128) -> ConverterResult<Option<Archive>> {
        let selected = self.selected_results();
        if selected.is_empty() {
            debug!("Download requested with nothing selected");
            return Ok(None);
        }

        let bytes = pack(selected.iter().map(|r| (r.filename.as_str(), r.bytes())))?;
        let archive = Archive {
            name: archive_name(epoch_ms),
            bytes,
            entries: selected.len(),
        };
        info!("Built {} with {} entries", archive.name, archive.entries);
        Ok(Some(archive))
    }

    /// Serializable view of the session for display.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_session(self)
    }
}
