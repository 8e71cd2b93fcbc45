use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
}

/// Progress of one batch conversion, reported once per source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub progress_type: ProgressType,
    /// Number of source files finished so far
    pub completed: usize,
    /// Number of source files in the batch
    pub total: usize,
    /// Progress percentage (0-100)
    pub percentage: usize,
    /// Name of the file that just completed
    #[serde(default)]
    pub current_file: Option<String>,
}

impl BatchProgress {
    pub fn new(progress_type: ProgressType, completed: usize, total: usize) -> Self {
        let percentage = if total > 0 { (completed * 100) / total } else { 0 };

        Self {
            progress_type,
            completed,
            total,
            percentage,
            current_file: None,
        }
    }

    pub fn with_file(mut self, name: impl Into<String>) -> Self {
        self.current_file = Some(name.into());
        self
    }
}

/// Progress of the batch currently in flight, shared with whoever renders it.
///
/// Only meaningful while a batch runs; cleared once it completes.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    current: Arc<Mutex<Option<BatchProgress>>>,
}

impl ProgressState {
    pub fn begin(&self, total: usize) {
        *self.current.lock() = Some(BatchProgress::new(ProgressType::Start, 0, total));
    }

    pub fn record(&self, progress: BatchProgress) {
        *self.current.lock() = Some(progress);
    }

    pub fn finish(&self) {
        *self.current.lock() = None;
    }

    pub fn current(&self) -> Option<BatchProgress> {
        self.current.lock().clone()
    }

    pub fn is_processing(&self) -> bool {
        self.current.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_uses_integer_division() {
        assert_eq!(BatchProgress::new(ProgressType::Progress, 1, 3).percentage, 33);
        assert_eq!(BatchProgress::new(ProgressType::Complete, 3, 3).percentage, 100);
        assert_eq!(BatchProgress::new(ProgressType::Start, 0, 0).percentage, 0);
    }

    #[test]
    fn state_resets_per_batch() {
        let state = ProgressState::default();
        assert!(!state.is_processing());

        state.begin(4);
        assert_eq!(state.current().map(|p| (p.completed, p.total)), Some((0, 4)));

        state.record(BatchProgress::new(ProgressType::Progress, 2, 4).with_file("b.png"));
        let current = state.current().unwrap();
        assert_eq!(current.completed, 2);
        assert_eq!(current.current_file.as_deref(), Some("b.png"));

        state.finish();
        assert!(state.current().is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(BatchProgress::new(ProgressType::Progress, 1, 2)).unwrap();
        assert_eq!(json["progressType"], "progress");
        assert_eq!(json["percentage"], 50);
    }
}
