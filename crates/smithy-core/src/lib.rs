//! Smithy Core - Shared library for forging scikit-learn estimator boilerplate
//!
//! This library validates user input, renders a python estimator class from an
//! embedded template and pipes it through an external formatter. It is used by
//! the `smith` binary, which exposes it through three front ends that share the
//! same validation and rendering logic.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure parsers (`parse_name`, `parse_params`,
//!   `check_duplicates`, `parse_tags`) and the template renderer
//! - **Layer 2: Orchestration** - [`ForgeForm`] session state with its parse
//!   cache, [`ForgeRequest`] and [`Forge`] (render, format, write)
//! - **Layer 3: Front Ends** - cliclack prompts, a ratatui form and an axum
//!   browser UI (each feature-gated)
//!
//! # Feature Flags
//!
//! - `prompts` (default): cliclack-based inline prompts
//! - `tui` (default): full-screen ratatui form
//! - `webui` (default): browser UI served with axum
//!
//! # Example Usage (without front ends)
//!
//! ```ignore
//! use smithy_core::{parse_name, EstimatorKind, Forge, ForgeRequest, SmithyConfig};
//!
//! let config = SmithyConfig::load(None)?;
//! let forge = Forge::from_config(&config)?;
//! let request = ForgeRequest::new(parse_name("MightyEstimator")?, EstimatorKind::Classifier)
//!     .with_params(vec!["alpha".into()], vec![])?;
//! let path = forge.forge_to_file(&request).await?;
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod form;
pub mod labels;
pub mod parsers;
pub mod request;
pub mod runtime;
pub mod templates;

#[cfg(feature = "prompts")]
pub mod prompts;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "webui")]
pub mod webui;

// Re-export main types for convenience
pub use config::{SmithyConfig, WebUiConfig};
pub use error::{ForgeError, FormatterFailure, ParseError};
pub use estimator::{EstimatorFlags, EstimatorKind, Flag, FlagAvailability, TagName};
pub use form::{Field, ForgeForm, FormInput, FormReport, ParseCache};
pub use parsers::{check_duplicates, parse_name, parse_params, parse_tags, ValidName};
pub use request::ForgeRequest;
pub use runtime::{Formatter, FormatterConfig};
pub use templates::{write_output, Forge};

#[cfg(feature = "prompts")]
pub use prompts::{run, ForgeArgs};
