//! External source formatter
//!
//! Generated code is piped through a formatter subprocess (`ruff format -` by
//! default) before it is shown or written. The formatter reads source on
//! stdin and writes the formatted source to stdout.

use crate::error::FormatterFailure;
use crate::runtime::version::check_compatibility;
use serde::{Deserialize, Serialize};
use std::io;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;

/// Configuration for the formatter command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Name of the formatter binary (e.g., "ruff")
    pub command: String,
    /// Arguments making the formatter read stdin and write stdout
    pub args: Vec<String>,
    /// Arguments printing the formatter version
    pub version_args: Vec<String>,
    /// Oldest formatter version known to work; `None` skips the check
    pub min_version: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            command: "ruff".to_string(),
            args: vec!["format".to_string(), "-".to_string()],
            version_args: vec!["--version".to_string()],
            min_version: Some("0.1.2".to_string()),
        }
    }
}

impl FormatterConfig {
    /// Build a config from a whitespace separated command line such as
    /// `"black -q -"`. Returns `None` for a blank command line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(String::from);
        let command = parts.next()?;
        Some(Self {
            command,
            args: parts.collect(),
            version_args: vec!["--version".to_string()],
            min_version: None,
        })
    }
}

/// Runs the configured formatter
#[derive(Debug, Clone)]
pub struct Formatter {
    config: FormatterConfig,
}

impl Formatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Full command line, for user-facing messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.config.command.as_str())
            .chain(self.config.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Get the installed formatter version (if available)
    pub fn get_version(&self) -> Option<String> {
        std::process::Command::new(&self.config.command)
            .args(&self.config.version_args)
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout)
                        .ok()
                        .map(|s| s.trim().to_string())
                } else {
                    None
                }
            })
    }

    /// Warn if the installed formatter is older than the configured minimum.
    ///
    /// A missing formatter is not reported here; it surfaces as
    /// [`FormatterFailure::Unavailable`] on the first [`Formatter::format`].
    pub fn check_version(&self) -> Option<String> {
        let minimum = self.config.min_version.as_deref()?;
        let installed = self.get_version()?;
        tracing::debug!(formatter = %self.config.command, version = %installed, "formatter version");
        check_compatibility(&installed, minimum, &self.config.command)
    }

    /// Format `source`, returning the formatter's stdout.
    ///
    /// Unformatted text is never returned: any failure to run the formatter
    /// to a successful exit is an error.
    pub async fn format(&self, source: &str) -> Result<String, FormatterFailure> {
        let command = self.command_line();
        tracing::debug!(%command, bytes = source.len(), "running formatter");

        let mut child = TokioCommand::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FormatterFailure::Unavailable {
                command: command.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| FormatterFailure::Io {
            command: command.clone(),
            source: io::Error::new(io::ErrorKind::BrokenPipe, "stdin was not captured"),
        })?;

        // Feed stdin concurrently so a large output cannot block the child
        let input = source.as_bytes().to_vec();
        let writer = tokio::spawn(async move {
            stdin.write_all(&input).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| FormatterFailure::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FormatterFailure::Exited {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        writer
            .await
            .map_err(io::Error::other)
            .and_then(|written| written)
            .map_err(|source| FormatterFailure::Io {
                command: command.clone(),
                source,
            })?;

        String::from_utf8(output.stdout).map_err(|_| FormatterFailure::InvalidOutput { command })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(line: &str) -> Formatter {
        Formatter::new(FormatterConfig::from_command_line(line).unwrap())
    }

    #[test]
    fn test_default_is_ruff() {
        let formatter = Formatter::new(FormatterConfig::default());
        assert_eq!(formatter.command_line(), "ruff format -");
        assert_eq!(formatter.config().min_version.as_deref(), Some("0.1.2"));
    }

    #[test]
    fn test_from_command_line() {
        let config = FormatterConfig::from_command_line("  black -q  - ").unwrap();
        assert_eq!(config.command, "black");
        assert_eq!(config.args, vec!["-q", "-"]);
        assert!(config.min_version.is_none());
        assert!(FormatterConfig::from_command_line("   ").is_none());
    }

    #[test]
    fn test_check_version_skipped_without_minimum() {
        assert!(formatter("cat").check_version().is_none());
    }

    #[tokio::test]
    async fn test_identity_formatter() {
        let formatted = formatter("cat").format("x = 1\n").await.unwrap();
        assert_eq!(formatted, "x = 1\n");
    }

    #[tokio::test]
    async fn test_missing_formatter_is_unavailable() {
        let result = formatter("smithy-no-such-formatter-binary -").format("x = 1\n").await;
        assert!(matches!(result, Err(FormatterFailure::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_failing_formatter_is_reported() {
        let result = formatter("false").format("x = 1\n").await;
        match result {
            Err(FormatterFailure::Exited { command, .. }) => assert_eq!(command, "false"),
            other => panic!("expected Exited, got {:?}", other),
        }
    }
}
