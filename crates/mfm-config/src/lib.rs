use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the default config location.
pub const CONFIG_ENV: &str = "MFM_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which grammar elements the MfM dialect recognises.
///
/// A disabled element is not an error: its lines fall through to paragraph
/// text, exactly as any other unrecognised line would.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialectConfig {
    /// Deepest heading level (`#` count) that still opens a section. Clamped to 1..=6.
    pub max_heading_level: u8,
    pub lists: bool,
    pub tables: bool,
    /// Blockquotes and asides (`>` prefixed lines).
    pub blocks: bool,
    pub code_fences: bool,
    /// Typographic arrows such as `->` and `<=>`.
    pub arrows: bool,
    /// `{ default; key=value }` option blocks on headings, blocks, fences, links and images.
    pub options: bool,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            max_heading_level: 4,
            lists: true,
            tables: true,
            blocks: true,
            code_fences: true,
            arrows: true,
            options: true,
        }
    }
}

impl DialectConfig {
    /// The heading level limit, clamped into the range the grammar supports.
    pub fn heading_limit(&self) -> u8 {
        self.max_heading_level.clamp(1, 6)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dialect: DialectConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the config, falling back to defaults when no file exists.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    /// `$MFM_CONFIG` when set, otherwise `~/.config/mfm/config.toml`.
    pub fn config_path() -> PathBuf {
        if let Ok(overridden) = std::env::var(CONFIG_ENV)
            && !overridden.is_empty()
        {
            let path = PathBuf::from(&overridden);
            return Self::expand_path(&path).unwrap_or(path);
        }
        let config_dir = shellexpand::tilde("~/.config/mfm");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
