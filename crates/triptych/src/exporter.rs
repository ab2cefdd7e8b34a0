use anyhow::{Context, Result};
use directories::UserDirs;
use std::path::PathBuf;
use tokio::fs;

use pagecore::{export, SourceSet};

/// Hands the export artifact to the host: writes `project.html` into the
/// user's download directory, or the working directory when the platform
/// has none.
pub struct Exporter {
    destination_dir: PathBuf,
}

impl Exporter {
    pub fn new() -> Self {
        let destination_dir = UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));
        Self { destination_dir }
    }

    pub fn with_destination(destination_dir: PathBuf) -> Self {
        Self { destination_dir }
    }

    /// Serializes current buffer state and saves it. Returns the written
    /// path for the status bar. Failures propagate untouched; there is no
    /// retry and nothing to roll back.
    pub async fn save(&self, sources: &SourceSet) -> Result<PathBuf> {
        let artifact = export(sources);
        let path = self.destination_dir.join(artifact.file_name);

        fs::create_dir_all(&self.destination_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create export directory: {}",
                    self.destination_dir.display()
                )
            })?;
        fs::write(&path, &artifact.bytes)
            .await
            .with_context(|| format!("Failed to write export: {}", path.display()))?;

        log::info!("Exported {} bytes to {}", artifact.bytes.len(), path.display());
        Ok(path)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}
