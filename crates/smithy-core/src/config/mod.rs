//! Configuration loading
//!
//! Settings come from, in increasing priority: built-in defaults, a YAML file
//! (`--config`, else `$SMITHY_CONFIG`, else `./smithy.yaml`), and the
//! `SMITHY_FORMATTER` environment variable.

use crate::runtime::FormatterConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "SMITHY_CONFIG";

/// Environment variable overriding the formatter command line
pub const FORMATTER_ENV: &str = "SMITHY_FORMATTER";

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "smithy.yaml";

/// Browser UI server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebUiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for WebUiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmithyConfig {
    pub formatter: FormatterConfig,
    pub webui: WebUiConfig,
}

impl SmithyConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to `null`
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Failed to parse smithy config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load configuration for the current process
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        Self::resolve(&cwd, explicit, |key| std::env::var(key).ok())
    }

    /// Resolve configuration relative to `dir`, reading environment
    /// variables through `env`
    pub fn resolve<F>(dir: &Path, explicit: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => env(CONFIG_ENV)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .or_else(|| {
                    let local = dir.join(DEFAULT_CONFIG_FILE);
                    local.is_file().then_some(local)
                }),
        };

        let mut config = match &source {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        if let Some(formatter) = env(FORMATTER_ENV)
            .as_deref()
            .and_then(FormatterConfig::from_command_line)
        {
            tracing::debug!(command = %formatter.command, "formatter overridden from environment");
            config.formatter = formatter;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SmithyConfig::resolve(dir.path(), None, env(&[])).unwrap();
        assert_eq!(config, SmithyConfig::default());
        assert_eq!(config.formatter.command, "ruff");
        assert_eq!(config.webui.port, 8501);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = SmithyConfig::from_yaml("webui:\n  port: 9000\n").unwrap();
        assert_eq!(config.webui.port, 9000);
        assert_eq!(config.webui.host, "127.0.0.1");
        assert_eq!(config.formatter, FormatterConfig::default());

        assert_eq!(SmithyConfig::from_yaml("").unwrap(), SmithyConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
formatter:
  command: black
  args: ["-q", "-"]
  version_args: ["--version"]
  min_version: "23.1.0"
webui:
  host: 0.0.0.0
  port: 8080
"#;
        let config = SmithyConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.formatter.command, "black");
        assert_eq!(config.formatter.args, vec!["-q", "-"]);
        assert_eq!(config.formatter.min_version.as_deref(), Some("23.1.0"));
        assert_eq!(config.webui.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(SmithyConfig::from_yaml("webui: [1, 2").is_err());
        assert!(SmithyConfig::from_yaml("webui:\n  port: not-a-port\n").is_err());
    }

    #[test]
    fn test_local_file_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "webui:\n  port: 9100\n").unwrap();

        let config = SmithyConfig::resolve(dir.path(), None, env(&[])).unwrap();
        assert_eq!(config.webui.port, 9100);
    }

    #[test]
    fn test_explicit_beats_env_beats_local() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "webui:\n  port: 9100\n").unwrap();
        let from_env = dir.path().join("env.yaml");
        std::fs::write(&from_env, "webui:\n  port: 9200\n").unwrap();
        let explicit = dir.path().join("explicit.yaml");
        std::fs::write(&explicit, "webui:\n  port: 9300\n").unwrap();

        let vars = [(CONFIG_ENV, from_env.to_str().unwrap())];

        let config = SmithyConfig::resolve(dir.path(), None, env(&vars)).unwrap();
        assert_eq!(config.webui.port, 9200);

        let config = SmithyConfig::resolve(dir.path(), Some(&explicit), env(&vars)).unwrap();
        assert_eq!(config.webui.port, 9300);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = SmithyConfig::resolve(dir.path(), Some(&missing), env(&[])).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.yaml"));
    }

    #[test]
    fn test_formatter_env_override() {
        let dir = TempDir::new().unwrap();
        let config =
            SmithyConfig::resolve(dir.path(), None, env(&[(FORMATTER_ENV, "cat")])).unwrap();
        assert_eq!(config.formatter.command, "cat");
        assert!(config.formatter.args.is_empty());

        // Blank override is ignored
        let config = SmithyConfig::resolve(dir.path(), None, env(&[(FORMATTER_ENV, " ")])).unwrap();
        assert_eq!(config.formatter.command, "ruff");
    }
}
