//! smith - forge scikit-learn compatible estimator boilerplate

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use smithy_core::{Forge, ForgeArgs, SmithyConfig};
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter
const LOG_ENV: &str = "SMITHY_LOG";

#[derive(Parser, Debug)]
#[command(name = "smith")]
#[command(about = "CLI to generate scikit-learn estimator boilerplate code")]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to $SMITHY_CONFIG, then ./smithy.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a new shiny scikit-learn compatible estimator
    Forge(CliForgeArgs),
    /// Run the terminal user interface
    ForgeTui,
    /// Run the web user interface
    ForgeWebui(WebUiArgs),
    /// Display library version
    Version,
}

#[derive(Parser, Debug)]
pub struct CliForgeArgs {
    /// Name of the estimator class
    #[arg(short, long)]
    pub name: Option<String>,

    /// Estimator type: classifier, regressor, outlier, transformer, cluster or feature-selector
    #[arg(short, long, alias = "estimator-type")]
    pub kind: Option<String>,

    /// Required parameters (comma-separated)
    #[arg(long, alias = "required-params")]
    pub required: Option<String>,

    /// Optional parameters (comma-separated)
    #[arg(long, alias = "optional-params")]
    pub optional: Option<String>,

    /// `.fit()` supports `sample_weight`
    #[arg(long)]
    pub sample_weight: bool,

    /// The estimator is linear (classifier or regressor only)
    #[arg(long)]
    pub linear: bool,

    /// Implement `predict_proba` (classifier or outlier detector only)
    #[arg(long)]
    pub predict_proba: bool,

    /// Implement `decision_function` (non-linear classifier only)
    #[arg(long)]
    pub decision_function: bool,

    /// Extra estimator tags (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,

    /// Destination file (defaults to `<name lowercased>.py`)
    #[arg(short, long, alias = "output-file")]
    pub output: Option<PathBuf>,

    /// Do not prompt: fail on missing or invalid values (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliForgeArgs> for ForgeArgs {
    fn from(args: CliForgeArgs) -> Self {
        ForgeArgs {
            name: args.name,
            kind: args.kind,
            required: args.required,
            optional: args.optional,
            sample_weight: args.sample_weight,
            linear: args.linear,
            predict_proba: args.predict_proba,
            decision_function: args.decision_function,
            tags: args.tags,
            output: args.output,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct WebUiArgs {
    /// Address to bind (overrides the config file)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides the config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open the browser
    #[arg(long)]
    pub no_open: bool,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("smithy_core=debug,smith=debug,info")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load(config_path: Option<&std::path::Path>) -> Result<(SmithyConfig, Forge)> {
    let config = SmithyConfig::load(config_path)?;
    let forge = Forge::from_config(&config).context("Failed to load estimator template")?;
    tracing::debug!(formatter = %forge.formatter().command_line(), "forge ready");
    Ok((config, forge))
}

async fn forge(config_path: Option<&std::path::Path>, args: ForgeArgs) -> Result<()> {
    let (_, forge) = load(config_path)?;
    let result = smithy_core::run(&forge, args).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result.map(|_| ())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);
    let config_path = args.config.as_deref();

    match args.command {
        Some(Command::Version) => {
            println!("{}", format!("sklearn-smithy={}", CLI_VERSION).green());
            Ok(())
        }
        Some(Command::Forge(forge_args)) => forge(config_path, forge_args.into()).await,
        Some(Command::ForgeTui) => {
            let (_, forge) = load(config_path)?;
            if let Some(path) = smithy_core::tui::run(&forge).await? {
                println!(
                    "{} {}",
                    "✓ Template forged at".green(),
                    path.display().to_string().bold()
                );
            }
            Ok(())
        }
        Some(Command::ForgeWebui(web_args)) => {
            let (config, forge) = load(config_path)?;
            let mut webui = config.webui;
            if let Some(host) = web_args.host {
                webui.host = host;
            }
            if let Some(port) = web_args.port {
                webui.port = port;
            }
            smithy_core::webui::serve(forge, &webui, !web_args.no_open).await
        }
        None => {
            // No subcommand provided, default to forge behavior (interactive mode)
            forge(config_path, ForgeArgs::default()).await
        }
    }
}
