//! Charm-style CLI prompts using cliclack
//!
//! Values passed on the command line are used as-is when valid. Missing or
//! invalid values are prompted for, unless `yes` is set, in which case a
//! missing name or kind and any invalid value are hard errors.

use crate::error::{ParseError, TAGS_DOCS_URL};
use crate::estimator::{EstimatorFlags, EstimatorKind, Flag};
use crate::labels;
use crate::parsers::{check_duplicates, parse_name, parse_params, parse_tags, ValidName};
use crate::request::ForgeRequest;
use crate::templates::Forge;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Arguments for the forge command
#[derive(Debug, Clone, Default)]
pub struct ForgeArgs {
    pub name: Option<String>,

    /// Estimator kind token, e.g. `classifier`
    pub kind: Option<String>,

    /// Comma separated required parameters
    pub required: Option<String>,

    /// Comma separated optional parameters
    pub optional: Option<String>,

    pub sample_weight: bool,
    pub linear: bool,
    pub predict_proba: bool,
    pub decision_function: bool,

    /// Comma separated extra tags
    pub tags: Option<String>,

    /// Destination file, defaults to `<name lowercased>.py`
    pub output: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl ForgeArgs {
    fn preset_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::SampleWeight => self.sample_weight,
            Flag::Linear => self.linear,
            Flag::PredictProba => self.predict_proba,
            Flag::DecisionFunction => self.decision_function,
        }
    }
}

/// Command line option matching a flag, for messages
fn flag_option(flag: Flag) -> &'static str {
    match flag {
        Flag::SampleWeight => "--sample-weight",
        Flag::Linear => "--linear",
        Flag::PredictProba => "--predict-proba",
        Flag::DecisionFunction => "--decision-function",
    }
}

/// Run the forge flow with interactive prompts, returning the written file
pub async fn run(forge: &Forge, args: ForgeArgs) -> Result<PathBuf> {
    cliclack::intro(console::style(" sklearn-smithy ").on_cyan().black())?;

    // Step 1: Name
    let name = select_name(&args)?;
    if let Some(advisory) = name.advisory() {
        cliclack::log::warning(advisory.to_string())?;
    }

    // Step 2: Kind
    let kind = select_kind(&args)?;

    // Step 3: Parameters
    let required = prompt_parsed(
        args.required.as_deref(),
        labels::PROMPT_REQUIRED,
        "alpha,beta",
        args.yes,
        parse_params,
    )?;
    let required_for_check = required.clone();
    let optional = prompt_parsed(
        args.optional.as_deref(),
        labels::PROMPT_OPTIONAL,
        "mu,sigma",
        args.yes,
        move |input: &str| {
            let optional = parse_params(input)?;
            check_duplicates(&required_for_check, &optional)?;
            Ok(optional)
        },
    )?;

    // Step 4: Flags that apply to this kind
    let flags = select_flags(kind, &args)?;

    // Step 5: Tags
    if args.tags.is_none() && !args.yes {
        cliclack::log::remark(format!(
            "To know more about tags, check the documentation at:\n{}",
            TAGS_DOCS_URL
        ))?;
    }
    let tags = prompt_parsed(
        args.tags.as_deref(),
        labels::PROMPT_TAGS,
        "allow_nan,binary_only",
        args.yes,
        parse_tags,
    )?;

    // Step 6: Destination
    let output = select_output(&name, &args)?;

    let request = ForgeRequest::new(name, kind)
        .with_params(required, optional)?
        .with_flags(flags)
        .with_tags(tags)
        .with_output(output);

    // Step 7: Forge
    if let Some(warning) = forge.formatter().check_version() {
        cliclack::log::warning(warning)?;
    }

    let spinner = cliclack::spinner();
    spinner.start("Forging estimator...");

    match forge.forge_to_file(&request).await {
        Ok(path) => {
            spinner.stop(format!("Forged {} ({})", request.name(), request.kind().display_name()));
            cliclack::outro(format!("Template forged at {}", path.display()))?;
            Ok(path)
        }
        Err(e) => {
            spinner.stop("Forging failed");
            Err(e).context("Failed to forge estimator")
        }
    }
}

fn select_name(args: &ForgeArgs) -> Result<ValidName> {
    if args.yes && args.name.is_none() {
        anyhow::bail!("An estimator name is required, pass it with --name");
    }
    prompt_parsed(
        args.name.as_deref(),
        labels::PROMPT_NAME,
        "MightyEstimator",
        args.yes,
        parse_name,
    )
}

fn select_kind(args: &ForgeArgs) -> Result<EstimatorKind> {
    if let Some(token) = &args.kind {
        match token.parse::<EstimatorKind>() {
            Ok(kind) => {
                cliclack::log::info(format!("Estimator type: {}", kind.display_name()))?;
                return Ok(kind);
            }
            Err(msg) if args.yes => anyhow::bail!(msg),
            Err(msg) => cliclack::log::error(msg)?,
        }
    } else if args.yes {
        anyhow::bail!("An estimator type is required, pass it with --kind");
    }

    let mut select = cliclack::select(labels::PROMPT_ESTIMATOR);
    for kind in EstimatorKind::ALL {
        select = select.item(kind, kind.display_name(), kind.token());
    }
    Ok(select.interact()?)
}

fn select_flags(kind: EstimatorKind, args: &ForgeArgs) -> Result<EstimatorFlags> {
    let mut flags = EstimatorFlags::default();

    // Order matters: `linear` decides whether `decision_function` is offered
    for flag in Flag::ALL {
        let offerable = flag.is_offerable(&kind.availability(flags.linear));
        let preset = args.preset_flag(flag);

        let value = if !offerable {
            if preset {
                cliclack::log::warning(format!(
                    "{} does not apply to a {} estimator, ignoring it",
                    flag_option(flag),
                    kind.display_name()
                ))?;
            }
            false
        } else if preset || args.yes {
            preset
        } else {
            cliclack::confirm(labels::flag_prompt(flag))
                .initial_value(false)
                .interact()?
        };
        flag.set(&mut flags, value);
    }

    Ok(flags.normalized(kind))
}

fn select_output(name: &ValidName, args: &ForgeArgs) -> Result<PathBuf> {
    let default = name.default_output_file();

    if let Some(output) = &args.output {
        return Ok(output.clone());
    }
    if args.yes {
        return Ok(default);
    }

    let default = default.display().to_string();
    let input: String = cliclack::input(labels::PROMPT_OUTPUT)
        .placeholder(&default)
        .default_input(&default)
        .interact()?;

    let input = input.trim();
    Ok(if input.is_empty() {
        PathBuf::from(default)
    } else {
        PathBuf::from(input)
    })
}

/// Use a preset value if it parses, otherwise prompt until it does.
///
/// In non-interactive mode a missing value is parsed as empty input and an
/// invalid preset is an error.
fn prompt_parsed<T, F>(
    preset: Option<&str>,
    label: &str,
    placeholder: &str,
    yes: bool,
    parse: F,
) -> Result<T>
where
    F: Fn(&str) -> Result<T, ParseError> + Clone + 'static,
{
    if let Some(value) = preset.or(yes.then_some("")) {
        match parse(value) {
            Ok(parsed) => return Ok(parsed),
            Err(e) if yes => return Err(e.into()),
            Err(e) => cliclack::log::error(e.to_string())?,
        }
    }

    loop {
        let validate = parse.clone();
        let input: String = cliclack::input(label)
            .placeholder(placeholder)
            .required(false)
            .validate(move |input: &String| {
                validate(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact()?;

        // Blank input may skip the validator
        match parse(&input) {
            Ok(parsed) => return Ok(parsed),
            Err(e) => cliclack::log::error(e.to_string())?,
        }
    }
}
