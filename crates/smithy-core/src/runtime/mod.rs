//! External tool management
//!
//! This module provides:
//! - The formatter subprocess used to clean up generated code
//! - Version comparison for the formatter

pub mod formatter;
pub mod version;

pub use formatter::{Formatter, FormatterConfig};
pub use version::{check_compatibility, parse_version};
