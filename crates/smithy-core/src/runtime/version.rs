//! Version comparison for the external formatter

use anyhow::Result;
use semver::Version;

/// Compare the installed formatter version against the minimum we target.
/// Returns a warning message if the installed formatter is older.
pub fn check_compatibility(installed: &str, minimum: &str, command: &str) -> Option<String> {
    let installed_ver = match parse_version(installed) {
        Ok(v) => v,
        Err(_) => return None, // Can't compare, skip warning
    };

    let minimum_ver = match parse_version(minimum) {
        Ok(v) => v,
        Err(_) => return None,
    };

    if installed_ver < minimum_ver {
        Some(format!(
            "Warning: `{}` {} is older than the supported minimum {}.\n\
             Generated code may not be formatted as expected.",
            command, installed, minimum
        ))
    } else {
        None
    }
}

/// Parse version string, handling various formats.
///
/// Accepts a bare version (`0.4.1`), a `v` prefix (`v0.4.1`) or the
/// `<tool> <version>` banner printed by `--version` (`ruff 0.4.1`).
pub fn parse_version(version_str: &str) -> Result<Version> {
    let last = version_str
        .split_whitespace()
        .last()
        .unwrap_or(version_str);
    let cleaned = last.strip_prefix('v').unwrap_or(last);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_older_than_minimum() {
        let warning = check_compatibility("0.1.0", "0.1.2", "ruff");
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("0.1.2"));
    }

    #[test]
    fn test_formatter_same_as_minimum() {
        assert!(check_compatibility("0.1.2", "0.1.2", "ruff").is_none());
    }

    #[test]
    fn test_formatter_newer_than_minimum() {
        assert!(check_compatibility("ruff 0.6.9", "0.1.2", "ruff").is_none());
    }

    #[test]
    fn test_invalid_versions() {
        // Should return None (no warning) for invalid versions
        assert!(check_compatibility("invalid", "0.1.2", "ruff").is_none());
        assert!(check_compatibility("0.1.0", "", "ruff").is_none());
    }

    #[test]
    fn test_parse_version_banner() {
        assert_eq!(parse_version("ruff 0.4.1").unwrap(), Version::new(0, 4, 1));
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert!(parse_version("ruff").is_err());
    }
}
