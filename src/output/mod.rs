//! Output rendering
//!
//! This module provides:
//! - JSON rendering with configurable indentation, to a file or stdout
//! - Per-package file writing for batch providers
//! - Text output for the batch summary and provider list

mod json;
mod text;

pub use json::{emit, to_json_string, write_package};
pub use text::TextFormatter;
