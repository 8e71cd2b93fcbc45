pub mod error;
pub mod validation;
pub mod formats;
pub mod fs;
pub mod size;

pub use error::{ConvertError, ConverterError, ConverterResult, FailureKind, PathError, ValidationError};
pub use validation::{validate_input_path, validate_inputs, validate_settings};
pub use formats::{ALL_FORMATS, TargetFormat, output_filename};
pub use fs::{extract_filename, read_source, sanitize_filename, write_output};
pub use size::format_bytes;
