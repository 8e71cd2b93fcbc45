// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod session;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{AppState, ConversionResult, ConverterSettings, ProcessedFile, SourceFile};
pub use processing::{BatchConverter, Encoder, NativeEncoder};
pub use session::{Session, SessionSummary};
pub use utils::{ConverterError, ConverterResult, TargetFormat, format_bytes};

// This library file is the public API of the converter.
// The command line entry point is in main.rs.
