//! Writing forged source to disk

use crate::error::ForgeError;
use std::path::Path;
use tokio::fs;

/// Write `contents` to `path`, creating missing parent directories.
///
/// The file is written in one call, after all fallible generation steps
/// have already succeeded.
pub async fn write_output(path: &Path, contents: &str) -> Result<(), ForgeError> {
    let write_error = |source| ForgeError::Write {
        path: path.to_path_buf(),
        source,
    };

    // Ensure parent directories exist
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    fs::write(path, contents).await.map_err(write_error)?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote estimator");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/estimator.py");

        write_output(&path, "class A:\n    ...\n").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "class A:\n    ...\n"
        );
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("estimator.py");
        std::fs::write(&path, "old").unwrap();

        write_output(&path, "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_write_failure_names_the_path() {
        let dir = TempDir::new().unwrap();
        // A regular file cannot act as a parent directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("estimator.py");

        let err = write_output(&path, "x").await.unwrap_err();
        assert!(matches!(err, ForgeError::Write { .. }));
        assert!(err.to_string().contains("estimator.py"));
    }
}
