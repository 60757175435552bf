//! Interactive form state shared by the front ends
//!
//! A [`ForgeForm`] holds the raw text a user typed plus the chosen kind and
//! flags for one session. Parsed values are cached per field in a
//! [`ParseCache`], so front ends can ask for validation on every keystroke
//! without re-parsing fields that did not change.

use crate::error::{ForgeError, ParseError};
use crate::estimator::{EstimatorFlags, EstimatorKind, Flag, FlagAvailability, TagName};
use crate::parsers::{check_duplicates, parse_name, parse_params, parse_tags, ValidName};
use crate::request::ForgeRequest;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Identifies one input of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Kind,
    Required,
    Optional,
    Tags,
    Output,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    raw: String,
    parsed: T,
}

impl<T> Entry<T> {
    fn new(raw: &str, parsed: T) -> Self {
        Self {
            raw: raw.to_owned(),
            parsed,
        }
    }
}

/// Per-session cache of parse results, keyed by field.
///
/// An entry is reused while the raw input for its field is unchanged.
#[derive(Debug, Default)]
pub struct ParseCache {
    name: Option<Entry<Result<ValidName, ParseError>>>,
    params: HashMap<Field, Entry<Result<Vec<String>, ParseError>>>,
    tags: Option<Entry<Result<Vec<TagName>, ParseError>>>,
    parses: usize,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, raw: &str) -> Result<ValidName, ParseError> {
        if self.name.as_ref().is_some_and(|entry| entry.raw != raw) {
            self.name = None;
        }
        let parses = &mut self.parses;
        self.name
            .get_or_insert_with(|| {
                *parses += 1;
                Entry::new(raw, parse_name(raw))
            })
            .parsed
            .clone()
    }

    /// Parse the parameter list stored under `field` (required or optional)
    pub fn params(&mut self, field: Field, raw: &str) -> Result<Vec<String>, ParseError> {
        let parses = &mut self.parses;
        let entry = self.params.entry(field).or_insert_with(|| {
            *parses += 1;
            Entry::new(raw, parse_params(raw))
        });
        if entry.raw != raw {
            *parses += 1;
            *entry = Entry::new(raw, parse_params(raw));
        }
        entry.parsed.clone()
    }

    pub fn tags(&mut self, raw: &str) -> Result<Vec<TagName>, ParseError> {
        if self.tags.as_ref().is_some_and(|entry| entry.raw != raw) {
            self.tags = None;
        }
        let parses = &mut self.parses;
        self.tags
            .get_or_insert_with(|| {
                *parses += 1;
                Entry::new(raw, parse_tags(raw))
            })
            .parsed
            .clone()
    }

    /// Number of times a parser actually ran
    pub fn parse_count(&self) -> usize {
        self.parses
    }
}

/// Raw form values as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub name: String,
    pub kind: Option<EstimatorKind>,
    pub required: String,
    pub optional: String,
    #[serde(flatten)]
    pub flags: EstimatorFlags,
    pub tags: String,
    /// Explicit destination; defaults to `<name lowercased>.py`
    pub output: Option<String>,
}

/// Validation state of the whole form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormReport {
    /// Blocking error message per field
    pub errors: BTreeMap<Field, String>,
    /// Non-blocking warnings per field
    pub advisories: BTreeMap<Field, String>,
    pub availability: FlagAvailability,
    /// Flags after non-applicable ones were forced off
    pub flags: EstimatorFlags,
    pub output: Option<PathBuf>,
    pub can_forge: bool,
}

/// Form state for one interactive session
#[derive(Debug, Default)]
pub struct ForgeForm {
    input: FormInput,
    cache: ParseCache,
}

impl ForgeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(input: FormInput) -> Self {
        let mut form = Self {
            input,
            cache: ParseCache::new(),
        };
        form.normalize_flags();
        form
    }

    /// Raw text of a text field
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.input.name,
            Field::Required => &self.input.required,
            Field::Optional => &self.input.optional,
            Field::Tags => &self.input.tags,
            Field::Output => self.input.output.as_deref().unwrap_or(""),
            Field::Kind => self.input.kind.map(|k| k.token()).unwrap_or(""),
        }
    }

    /// Mutable access to the raw text of a text field
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Name => Some(&mut self.input.name),
            Field::Required => Some(&mut self.input.required),
            Field::Optional => Some(&mut self.input.optional),
            Field::Tags => Some(&mut self.input.tags),
            Field::Output => Some(self.input.output.get_or_insert_with(String::new)),
            Field::Kind => None,
        }
    }

    pub fn set_text(&mut self, field: Field, value: impl Into<String>) {
        if let Some(text) = self.text_mut(field) {
            *text = value.into();
        }
    }

    pub fn kind(&self) -> Option<EstimatorKind> {
        self.input.kind
    }

    /// Change the kind; flags that no longer apply are reset
    pub fn set_kind(&mut self, kind: EstimatorKind) {
        self.input.kind = Some(kind);
        self.normalize_flags();
    }

    pub fn flags(&self) -> EstimatorFlags {
        self.input.flags
    }

    /// Set a flag. Setting a flag that is not offerable is ignored.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        if value && !flag.is_offerable(&self.availability()) {
            tracing::debug!(?flag, "ignoring flag not offerable for current kind");
            return;
        }
        flag.set(&mut self.input.flags, value);
        self.normalize_flags();
    }

    pub fn toggle_flag(&mut self, flag: Flag) {
        let current = flag.get(&self.input.flags);
        self.set_flag(flag, !current);
    }

    /// Which flags can be offered for the current kind and linear choice
    pub fn availability(&self) -> FlagAvailability {
        self.input
            .kind
            .map(|kind| kind.availability(self.input.flags.linear))
            .unwrap_or_default()
    }

    fn normalize_flags(&mut self) {
        self.input.flags = match self.input.kind {
            Some(kind) => self.input.flags.normalized(kind),
            None => EstimatorFlags {
                sample_weight: self.input.flags.sample_weight,
                ..EstimatorFlags::default()
            },
        };
    }

    pub fn name(&mut self) -> Result<ValidName, ParseError> {
        self.cache.name(&self.input.name)
    }

    pub fn required(&mut self) -> Result<Vec<String>, ParseError> {
        self.cache.params(Field::Required, &self.input.required)
    }

    /// Optional parameters, also checked against the required ones
    pub fn optional(&mut self) -> Result<Vec<String>, ParseError> {
        let optional = self.cache.params(Field::Optional, &self.input.optional)?;
        if let Ok(required) = self.required() {
            check_duplicates(&required, &optional)?;
        }
        Ok(optional)
    }

    pub fn tags(&mut self) -> Result<Vec<TagName>, ParseError> {
        self.cache.tags(&self.input.tags)
    }

    /// Destination path: explicit output or derived from a valid name
    pub fn output(&mut self) -> Option<PathBuf> {
        match self.input.output.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => self.name().ok().map(|name| name.default_output_file()),
        }
    }

    /// Validate every field
    pub fn report(&mut self) -> FormReport {
        let mut report = FormReport {
            availability: self.availability(),
            flags: self.input.flags,
            ..FormReport::default()
        };

        match self.name() {
            Ok(name) => {
                if let Some(advisory) = name.advisory() {
                    report.advisories.insert(Field::Name, advisory.to_string());
                }
            }
            Err(e) => {
                report.errors.insert(Field::Name, e.to_string());
            }
        }

        if self.input.kind.is_none() {
            report
                .errors
                .insert(Field::Kind, "Please select an estimator type".to_string());
        }

        if let Err(e) = self.required() {
            report.errors.insert(Field::Required, e.to_string());
        }
        if let Err(e) = self.optional() {
            report.errors.insert(Field::Optional, e.to_string());
        }
        if let Err(e) = self.tags() {
            report.errors.insert(Field::Tags, e.to_string());
        }

        report.output = self.output();
        report.can_forge = report.errors.is_empty();
        report
    }

    /// Build the request, failing on the first blocking error
    pub fn to_request(&mut self) -> Result<ForgeRequest, ForgeError> {
        let name = self.name()?;
        let kind = self
            .input
            .kind
            .ok_or(ForgeError::Incomplete("no estimator type selected"))?;
        let required = self.required()?;
        let optional = self.cache.params(Field::Optional, &self.input.optional)?;
        let tags = self.tags()?;

        let mut request = ForgeRequest::new(name, kind)
            .with_params(required, optional)?
            .with_flags(self.input.flags)
            .with_tags(tags);
        if let Some(output) = self.output() {
            request = request.with_output(output);
        }
        Ok(request)
    }
}
