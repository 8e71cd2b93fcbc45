//! Command handlers for the host.
//!
//! This module exposes the operations a host (UI or CLI) drives:
//! - [`convert_images`] / [`convert_bytes`]: Convert a batch into every format
//! - [`toggle_artifact`], [`toggle_format`], [`toggle_all`]: Edit the selection
//! - [`remove_file`], [`clear_session`]: Drop files and their handles
//! - [`download_archive`], [`export_selected`]: Write the selection out

mod convert;
mod download;
mod selection;

pub use convert::*;
pub use download::*;
pub use selection::*;
