//! Estimator forging: render, format, write
//!
//! This module provides:
//! - The embedded estimator template and its renderer
//! - [`Forge`], pairing the renderer with the configured formatter
//! - Output writing

pub mod renderer;
pub mod writer;

use crate::config::SmithyConfig;
use crate::error::ForgeError;
use crate::request::ForgeRequest;
use crate::runtime::Formatter;
use std::path::PathBuf;

pub use renderer::{Renderer, TEMPLATE_PATH};
pub use writer::write_output;

/// Turns a [`ForgeRequest`] into formatted python source
pub struct Forge {
    renderer: Renderer,
    formatter: Formatter,
}

impl Forge {
    pub fn new(formatter: Formatter) -> Result<Self, ForgeError> {
        Ok(Self {
            renderer: Renderer::new()?,
            formatter,
        })
    }

    pub fn from_config(config: &SmithyConfig) -> Result<Self, ForgeError> {
        Self::new(Formatter::new(config.formatter.clone()))
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Render the template unformatted
    pub fn render(&self, request: &ForgeRequest) -> Result<String, ForgeError> {
        self.renderer.render(request)
    }

    /// Render the template and run the result through the formatter
    pub async fn forge(&self, request: &ForgeRequest) -> Result<String, ForgeError> {
        let rendered = self.renderer.render(request)?;
        let formatted = self.formatter.format(&rendered).await?;
        Ok(formatted)
    }

    /// Forge and write to the request's output path.
    ///
    /// Nothing is written when rendering or formatting fails.
    pub async fn forge_to_file(&self, request: &ForgeRequest) -> Result<PathBuf, ForgeError> {
        let code = self.forge(request).await?;
        write_output(request.output(), &code).await?;
        Ok(request.output().to_path_buf())
    }
}
