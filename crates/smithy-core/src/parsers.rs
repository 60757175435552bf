//! Parsers turning free-text user input into validated values
//!
//! All parsers are pure functions; front ends call them on every input change
//! (or through a [`crate::form::ParseCache`]) and show the error message when
//! they fail.

use crate::error::ParseError;
use crate::estimator::TagName;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use unicode_ident::{is_xid_continue, is_xid_start};

/// Python reserved keywords (`keyword.kwlist`)
const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Check that `s` is a bare identifier: an `XID_Start` character or underscore
/// followed by `XID_Continue` characters, as python's `str.isidentifier`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || is_xid_start(first) => chars.all(is_xid_continue),
        _ => false,
    }
}

/// Check if `s` collides with a python keyword
pub fn is_reserved(s: &str) -> bool {
    PYTHON_KEYWORDS.contains(&s)
}

/// An estimator name that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidName {
    name: String,
    reserved: bool,
}

impl ValidName {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn into_string(self) -> String {
        self.name
    }

    pub fn is_reserved(&self) -> bool {
        self.reserved
    }

    /// Non-blocking warning to show alongside the name, if any
    pub fn advisory(&self) -> Option<ParseError> {
        self.reserved
            .then(|| ParseError::ReservedWord(self.name.clone()))
    }

    /// Default destination file derived from the name
    pub fn default_output_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.py", self.name.to_lowercase()))
    }
}

/// Validate that `input` can be used as a python class name.
///
/// Reserved keywords are accepted; the returned value carries an advisory.
pub fn parse_name(input: &str) -> Result<ValidName, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyName);
    }
    if !is_identifier(input) {
        return Err(ParseError::InvalidName(input.to_string()));
    }

    let reserved = is_reserved(input);
    if reserved {
        tracing::debug!(name = input, "estimator name is a reserved keyword");
    }

    Ok(ValidName {
        name: input.to_string(),
        reserved,
    })
}

/// Split comma separated input; blank input yields no tokens
fn split_tokens(input: &str) -> Vec<&str> {
    if input.trim().is_empty() {
        return Vec::new();
    }
    input.split(',').map(str::trim).collect()
}

/// Parse a comma separated list of constructor parameter names.
///
/// Order is preserved since it drives the constructor signature.
pub fn parse_params(input: &str) -> Result<Vec<String>, ParseError> {
    let tokens = split_tokens(input);

    let invalid: Vec<String> = tokens
        .iter()
        .filter(|token| !is_identifier(token))
        .map(|token| token.to_string())
        .collect();
    if !invalid.is_empty() {
        return Err(ParseError::InvalidIdentifier(invalid));
    }

    let mut seen = HashSet::new();
    if !tokens.iter().all(|token| seen.insert(*token)) {
        return Err(ParseError::DuplicateParameter);
    }

    Ok(tokens.into_iter().map(String::from).collect())
}

/// Check that no parameter is both required and optional
pub fn check_duplicates(required: &[String], optional: &[String]) -> Result<(), ParseError> {
    let required: HashSet<&String> = required.iter().collect();
    let overlap: BTreeSet<String> = optional
        .iter()
        .filter(|param| required.contains(param))
        .cloned()
        .collect();

    if overlap.is_empty() {
        Ok(())
    } else {
        Err(ParseError::DuplicateAcrossLists(overlap))
    }
}

/// Parse a comma separated list of scikit-learn extra tags.
///
/// Repeated tags are kept once, in first-seen order.
pub fn parse_tags(input: &str) -> Result<Vec<TagName>, ParseError> {
    let tokens = split_tokens(input);

    let unknown: Vec<String> = tokens
        .iter()
        .filter(|token| TagName::lookup(token).is_none())
        .map(|token| token.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(ParseError::UnknownTag(unknown));
    }

    let mut tags = Vec::new();
    for tag in tokens.iter().filter_map(|token| TagName::lookup(token)) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}
