use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

use pagecore::SourceKind;

use crate::compositor::DEFAULT_DEBOUNCE_MS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub theme: Theme,
    pub editor: EditorConfig,
    pub preview: PreviewConfig,
    pub start_pane: SourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub syntax_theme: String,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub status_background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub use_spaces: bool,
    pub line_numbers: bool,
    pub highlight_current_line: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Quiescence window after the last edit before the preview re-renders.
    pub debounce_ms: u64,
    /// Launch the browser on the preview file once at startup.
    pub open_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme {
                name: String::from("dark"),
                syntax_theme: String::from("base16-ocean.dark"),
                accent_color: Some(String::from("#FFD166")),
                status_background: Some(String::from("#005F87")),
            },
            editor: EditorConfig {
                tab_size: 4,
                use_spaces: true,
                line_numbers: true,
                highlight_current_line: true,
            },
            preview: PreviewConfig {
                debounce_ms: DEFAULT_DEBOUNCE_MS,
                open_on_start: false,
            },
            start_pane: SourceKind::Html,
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) if content.trim().is_empty() => {
                        log::warn!("Config file is empty, creating new one");
                    }
                    Ok(content) => match serde_json::from_str::<Self>(&content) {
                        Ok(mut config) => {
                            config.validate()?;
                            log::info!("Loaded config from: {}", config_path.display());
                            return Ok(config);
                        }
                        Err(json_err) => {
                            log::error!("Failed to parse config file: {}", json_err);
                            // Keep the broken file around rather than clobbering it.
                            let backup_path = config_path.with_extension("bak");
                            if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                log::warn!("Failed to backup broken config: {}", e);
                            } else {
                                log::info!("Backed up broken config to: {}", backup_path.display());
                            }
                        }
                    },
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        let default_config = Self::default();
        let _ = default_config.save().await;
        Ok(default_config)
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    )
                })?;
            }

            let content = serde_json::to_string_pretty(&config_to_save)?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!("Failed to write config file: {} - {}", config_path.display(), e)
            })?;
            log::info!("Saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones.
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.tab_size == 0 || self.editor.tab_size > 16 {
            log::warn!("Invalid tab size: {}, using default", self.editor.tab_size);
            self.editor.tab_size = 4;
            has_issues = true;
        }

        // Anything below ~50ms renders on nearly every keystroke.
        if self.preview.debounce_ms < 50 || self.preview.debounce_ms > 10_000 {
            log::warn!(
                "Invalid debounce window: {}ms, using default",
                self.preview.debounce_ms
            );
            self.preview.debounce_ms = DEFAULT_DEBOUNCE_MS;
            has_issues = true;
        }

        if self.theme.name.is_empty() {
            log::warn!("Empty theme name, using default");
            self.theme.name = "dark".to_string();
            has_issues = true;
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = "base16-ocean.dark".to_string();
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TRIPTYCH_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("TRIPTYCH_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("com", "triptych", "triptych")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
