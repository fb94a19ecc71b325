/// Bookmark configuration: load, save and sanitize.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the JSON config file.
const CONFIG_FILE_NAME: &str = "line-marks.json";

/// Name of the state database inside the data directory.
const STATE_FILE_NAME: &str = "line-marks-state.redb";

/// Default length of a line preview, including the ellipsis.
const DEFAULT_PREVIEW_MAX_CHARS: usize = 50;

/// Top-level bookmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarksConfig {
    /// Verbose logging of store operations.
    pub debug: bool,
    /// Reveal navigation targets at the top of the view instead of centering them.
    pub align_top_on_navigation: bool,
    /// Max characters of a line preview in listings (4..=500).
    pub preview_max_chars: usize,
    /// Folders that listed paths are shown relative to.
    pub workspace_roots: Vec<PathBuf>,
    /// Overrides the state database location. Empty = data directory.
    pub state_file: String,
}

impl Default for MarksConfig {
    fn default() -> Self {
        Self {
            debug: false,
            align_top_on_navigation: false,
            preview_max_chars: DEFAULT_PREVIEW_MAX_CHARS,
            workspace_roots: Vec::new(),
            state_file: String::new(),
        }
    }
}

impl MarksConfig {
    /// Returns the config file path: exe directory + `line-marks.json`.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads config from `path`, creating a default file if it doesn't exist.
    /// Returns defaults on any error (missing file, parse error, etc.).
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match serde_json::from_str::<MarksConfig>(&contents) {
                    Ok(mut config) => {
                        config.sanitize();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {}: {e}", path.display());
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {}: {e}", path.display());
                }
            }
            // Broken files are left alone.
            Self::default()
        } else {
            let config = Self::default();
            if let Err(e) = config.save(path) {
                tracing::warn!("Failed to create default config at {}: {e}", path.display());
            }
            config
        }
    }

    /// Saves config to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Where the bookmark state database lives.
    pub fn state_path(&self) -> PathBuf {
        if self.state_file.trim().is_empty() {
            resolve_data_dir().join(STATE_FILE_NAME)
        } else {
            PathBuf::from(self.state_file.trim())
        }
    }

    /// Clamps values to valid ranges and resets invalid fields.
    pub fn sanitize(&mut self) {
        self.preview_max_chars = self.preview_max_chars.clamp(4, 500);
        self.workspace_roots.retain(|root| !root.as_os_str().is_empty());
    }
}

/// Resolves the data directory path.
///
/// Resolution order:
/// 1. `LINE_MARKS_DATA_DIR` environment variable
/// 2. Platform local data directory + `line-marks`
/// 3. `.data/` directory next to the executable
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LINE_MARKS_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Some(dir) = dirs::data_local_dir() {
        return dir.join("line-marks");
    }
    let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    exe.parent().unwrap_or(Path::new(".")).join(".data")
}
