//! Application state shared by the command handlers.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::{BlobRegistry, ConverterSettings, ProgressState};
use crate::processing::{BatchConverter, NativeEncoder};
use crate::session::Session;
use crate::utils::{ConverterResult, validate_settings};

/// State owned by the host for the lifetime of the application.
///
/// Cheap to clone; clones share the session, the blob registry and the
/// progress of the batch in flight.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<ConverterSettings>,
    registry: BlobRegistry,
    session: Arc<Mutex<Session>>,
    progress: ProgressState,
}

impl AppState {
    /// Validates `settings` and creates an empty session.
    pub fn new(settings: ConverterSettings) -> ConverterResult<Self> {
        validate_settings(&settings)?;
        debug!(
            "AppState initialized (avif speed {}, disabled formats {:?})",
            settings.avif_speed, settings.disabled_formats
        );

        Ok(Self {
            session: Arc::new(Mutex::new(Session::with_auto_select(settings.auto_select_new))),
            settings: Arc::new(settings),
            registry: BlobRegistry::new(),
            progress: ProgressState::default(),
        })
    }

    /// Creates a converter backed by the native encoder.
    pub fn create_converter(&self) -> BatchConverter<NativeEncoder> {
        let encoder = NativeEncoder::new(self.registry.clone(), (*self.settings).clone());
        BatchConverter::new(encoder, self.registry.clone())
    }

    pub fn registry(&self) -> &BlobRegistry {
        &self.registry
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_settings() {
        let settings = ConverterSettings {
            avif_speed: 0,
            ..ConverterSettings::default()
        };
        assert!(AppState::new(settings).is_err());
    }

    #[tokio::test]
    async fn clones_share_the_session() {
        let state = AppState::new(ConverterSettings::default()).unwrap();
        let other = state.clone();
        assert!(state.session().lock().await.files().is_empty());
        assert!(Arc::ptr_eq(state.session(), other.session()));
    }
}
