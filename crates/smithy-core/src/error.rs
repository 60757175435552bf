//! Error types for input validation and template forging

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Documentation page listing the scikit-learn estimator tags
pub const TAGS_DOCS_URL: &str = "https://scikit-learn.org/dev/developers/develop.html#estimator-tags";

/// Validation failures for free-text user input
///
/// Every variant except [`ParseError::ReservedWord`] blocks forging until the
/// input is corrected. A reserved word is only an advisory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Name cannot be empty!")]
    EmptyName,

    #[error("`{0}` is not a valid python class name!")]
    InvalidName(String),

    #[error("`{0}` is a python reserved keyword!")]
    ReservedWord(String),

    #[error(
        "The following parameters are invalid python identifiers: {}",
        tuple_repr(.0)
    )]
    InvalidIdentifier(Vec<String>),

    #[error("Found repeated parameters!")]
    DuplicateParameter,

    #[error(
        "The following parameters are duplicated between required and optional: {}",
        set_repr(.0)
    )]
    DuplicateAcrossLists(BTreeSet<String>),

    #[error(
        "The following tags are not available: {}.\nPlease check the official documentation at {} to know which values are available.",
        tuple_repr(.0),
        TAGS_DOCS_URL
    )]
    UnknownTag(Vec<String>),
}

impl ParseError {
    /// Whether this error must stop the user from forging
    pub fn is_blocking(&self) -> bool {
        !matches!(self, ParseError::ReservedWord(_))
    }
}

/// Render a list of tokens the way python prints a tuple of strings
fn tuple_repr(tokens: &[String]) -> String {
    let quoted: Vec<String> = tokens.iter().map(|t| format!("'{}'", t)).collect();
    match quoted.as_slice() {
        [single] => format!("({},)", single),
        _ => format!("({})", quoted.join(", ")),
    }
}

/// Render a set of tokens the way python prints a set of strings
fn set_repr(tokens: &BTreeSet<String>) -> String {
    let quoted: Vec<String> = tokens.iter().map(|t| format!("'{}'", t)).collect();
    format!("{{{}}}", quoted.join(", "))
}

/// The external formatter could not produce formatted source
#[derive(Debug, Error)]
pub enum FormatterFailure {
    #[error("formatter `{command}` is not available: {source}")]
    Unavailable {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("formatter `{command}` exited with {status}: {stderr}")]
    Exited {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("failed to communicate with formatter `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("formatter `{command}` produced output that is not valid UTF-8")]
    InvalidOutput { command: String },
}

/// Failures while turning a request into a written source file
#[derive(Debug, Error)]
pub enum ForgeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot forge yet: {0}")]
    Incomplete(&'static str),

    #[error("failed to compile template `{path}`: {source}")]
    TemplateCompile {
        path: &'static str,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to render template: {0}")]
    TemplateRender(#[from] handlebars::RenderError),

    #[error(transparent)]
    Formatter(#[from] FormatterFailure),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_lists_every_token() {
        let err = ParseError::InvalidIdentifier(vec!["123a".to_string(), "b c".to_string()]);
        assert_eq!(
            err.to_string(),
            "The following parameters are invalid python identifiers: ('123a', 'b c')"
        );
    }

    #[test]
    fn test_single_unknown_tag_uses_trailing_comma() {
        let err = ParseError::UnknownTag(vec!["some_madeup_tag".to_string()]);
        assert!(err
            .to_string()
            .starts_with("The following tags are not available: ('some_madeup_tag',)"));
        assert!(err.to_string().contains(TAGS_DOCS_URL));
    }

    #[test]
    fn test_duplicates_rendered_as_set() {
        let overlap: BTreeSet<String> = ["b".to_string()].into_iter().collect();
        assert_eq!(
            ParseError::DuplicateAcrossLists(overlap).to_string(),
            "The following parameters are duplicated between required and optional: {'b'}"
        );
    }

    #[test]
    fn test_only_reserved_word_is_advisory() {
        assert!(!ParseError::ReservedWord("class".to_string()).is_blocking());
        assert!(ParseError::EmptyName.is_blocking());
        assert!(ParseError::DuplicateParameter.is_blocking());
    }
}
