//! File-save collaborator for configuration exports and rendered downloads.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Hands a finished file to the user.
pub trait FileSaver {
    /// Saves `bytes` under `filename`, returning where the file ended up.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves files into a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    /// Saver targeting `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .filter(|name| name.len() == filename.len())
            .context(format!("Invalid export file name '{filename}'"))?;

        fs::create_dir_all(&self.dir).context(format!(
            "Failed to create export directory: {}",
            self.dir.display()
        ))?;

        let path = self.dir.join(name);
        fs::write(&path, bytes)
            .context(format!("Failed to write export file: {}", path.display()))?;

        tracing::info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_saver_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let saver = DirectorySaver::new(temp_dir.path().join("out"));

        let path = saver.save("qr-config.json", b"{}").unwrap();
        assert_eq!(path, temp_dir.path().join("out/qr-config.json"));
        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }

    #[test]
    fn test_directory_saver_rejects_paths() {
        let temp_dir = TempDir::new().unwrap();
        let saver = DirectorySaver::new(temp_dir.path());

        assert!(saver.save("../qr-code.png", b"x").is_err());
        assert!(saver.save("", b"x").is_err());
    }
}
