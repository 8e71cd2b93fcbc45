//! Core application types and state management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`AppState`]: State shared by the command handlers
//! - [`BlobRegistry`] / [`ObjectHandle`]: Revocable in-memory byte handles
//! - [`SourceFile`], [`ConversionResult`], [`ProcessedFile`]: Inputs and their outputs
//! - [`ConverterSettings`]: Quality and host capability configuration
//! - [`BatchProgress`]: Progress tracking for batch conversions

pub mod handle;
mod progress;
mod state;
mod types;

pub use handle::{BlobRegistry, HandleId, ObjectHandle};
pub use progress::{BatchProgress, ProgressState, ProgressType};
pub use state::AppState;
pub use types::{ConversionResult, ConverterSettings, FormatFailure, ProcessedFile, QualitySettings, SourceFile};
