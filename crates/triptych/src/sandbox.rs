use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// The isolated rendering surface.
///
/// The preview lives as a single page file in a private per-session
/// directory; whatever browser the user points at it runs the page in a
/// separate process with its own document, storage and script realm. A
/// script that throws, loops or rewrites its whole document can only ever
/// affect that browser tab, never this application.
pub struct SandboxSurface {
    dir: PathBuf,
    page_path: PathBuf,
    renders: u64,
}

const PAGE_FILE: &str = "index.html";
const STAGING_FILE: &str = ".index.html.tmp";

impl SandboxSurface {
    /// Creates the session directory under the system temp dir.
    ///
    /// Each surface gets its own directory so concurrent instances never
    /// publish over each other's page file.
    pub async fn create() -> Result<Self> {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let dir = std::env::temp_dir().join(format!(
            "triptych-preview-{}-{}",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        Self::at(dir).await
    }

    pub async fn at(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create preview directory: {}", dir.display()))?;
        let page_path = dir.join(PAGE_FILE);
        log::info!("Preview surface at: {}", page_path.display());
        Ok(Self {
            dir,
            page_path,
            renders: 0,
        })
    }

    pub fn page_path(&self) -> &Path {
        &self.page_path
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Replaces the entire surface content with the composed document.
    ///
    /// The document is staged in a scratch file and renamed over the page
    /// file so a browser reloading mid-write never sees a half-written
    /// page. Full reload semantics: the previous document, along with any
    /// timers or globals its script created, is simply gone.
    pub async fn render(&mut self, document: &str) -> Result<()> {
        let staging = self.dir.join(STAGING_FILE);
        fs::write(&staging, document.as_bytes())
            .await
            .with_context(|| format!("Failed to stage preview: {}", staging.display()))?;
        fs::rename(&staging, &self.page_path)
            .await
            .with_context(|| format!("Failed to publish preview: {}", self.page_path.display()))?;
        self.renders += 1;
        log::debug!("Rendered preview #{} ({} bytes)", self.renders, document.len());
        Ok(())
    }

    /// Opens the page file with the platform's default handler, detached.
    pub fn open(&self) -> Result<()> {
        let path = &self.page_path;
        let mut command = if cfg!(target_os = "macos") {
            let mut c = Command::new("open");
            c.arg(path);
            c
        } else if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]).arg(path);
            c
        } else {
            let mut c = Command::new("xdg-open");
            c.arg(path);
            c
        };

        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to open preview: {}", path.display()))?;
        log::info!("Opened preview in browser: {}", path.display());
        Ok(())
    }

    /// Best-effort removal of the session directory.
    pub async fn cleanup(&self) {
        if let Err(e) = fs::remove_dir_all(&self.dir).await {
            log::warn!("Failed to remove preview directory: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_render_publishes_page() {
        let tmp = TempDir::new().unwrap();
        let mut surface = SandboxSurface::at(tmp.path().join("session")).await.unwrap();

        surface.render("<!DOCTYPE html><p>one</p>").await.unwrap();
        let content = fs::read_to_string(surface.page_path()).await.unwrap();
        assert_eq!(content, "<!DOCTYPE html><p>one</p>");
        assert_eq!(surface.render_count(), 1);
    }

    #[tokio::test]
    async fn test_render_replaces_whole_content() {
        let tmp = TempDir::new().unwrap();
        let mut surface = SandboxSurface::at(tmp.path().join("session")).await.unwrap();

        surface.render("<p>first</p>").await.unwrap();
        surface.render("<p>second</p>").await.unwrap();
        let content = fs::read_to_string(surface.page_path()).await.unwrap();
        assert_eq!(content, "<p>second</p>");
        assert_eq!(surface.render_count(), 2);
    }

    #[tokio::test]
    async fn test_no_staging_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("session");
        let mut surface = SandboxSurface::at(dir.clone()).await.unwrap();
        surface.render("<p>x</p>").await.unwrap();
        assert!(!dir.join(STAGING_FILE).exists());
    }

    #[tokio::test]
    async fn test_cleanup_removes_session_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("session");
        let mut surface = SandboxSurface::at(dir.clone()).await.unwrap();
        surface.render("<p>x</p>").await.unwrap();
        surface.cleanup().await;
        assert!(!dir.exists());
    }
}
