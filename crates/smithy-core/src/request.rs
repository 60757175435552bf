//! Fully validated input to the renderer

use crate::error::ParseError;
use crate::estimator::{EstimatorFlags, EstimatorKind, TagName};
use crate::parsers::{check_duplicates, ValidName};
use std::path::{Path, PathBuf};

/// Everything needed to forge one estimator file.
///
/// Built fresh for each invocation. Flags are always normalized for the kind,
/// so a request can never ask for a branch the kind does not support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeRequest {
    name: String,
    kind: EstimatorKind,
    required: Vec<String>,
    optional: Vec<String>,
    flags: EstimatorFlags,
    tags: Vec<TagName>,
    output: PathBuf,
}

impl ForgeRequest {
    pub fn new(name: ValidName, kind: EstimatorKind) -> Self {
        let output = name.default_output_file();
        Self {
            name: name.into_string(),
            kind,
            required: Vec::new(),
            optional: Vec::new(),
            flags: EstimatorFlags::default(),
            tags: Vec::new(),
            output,
        }
    }

    /// Set constructor parameters; fails if a name is both required and optional
    pub fn with_params(
        mut self,
        required: Vec<String>,
        optional: Vec<String>,
    ) -> Result<Self, ParseError> {
        check_duplicates(&required, &optional)?;
        self.required = required;
        self.optional = optional;
        Ok(self)
    }

    pub fn with_flags(mut self, flags: EstimatorFlags) -> Self {
        self.flags = flags.normalized(self.kind);
        self
    }

    pub fn with_tags(mut self, tags: Vec<TagName>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EstimatorKind {
        self.kind
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Required parameters followed by optional ones
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(String::as_str)
    }

    pub fn flags(&self) -> EstimatorFlags {
        self.flags
    }

    pub fn tags(&self) -> &[TagName] {
        &self.tags
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}
