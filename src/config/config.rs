use crate::data::table_view::{normalize_rows_per_page, DEFAULT_ROWS_PER_PAGE};
use crate::search_filter::FilterMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the directory endpoint
pub const API_URL_ENV: &str = "URL_API_APPLICATIONS";

/// Endpoint baked in at build time, if the variable was set then
const BUILD_API_URL: Option<&str> = option_env!("URL_API_APPLICATIONS");

pub const FALLBACK_API_URL: &str = "http://localhost:5000/api/applications";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Directory endpoint; unset means the build-time or fallback URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Rows per table page: 5, 10 or 25
    pub rows_per_page: usize,

    /// Use Unicode glyphs for markers
    pub use_glyphs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Global filter matching: "contains", "fuzzy" or "regex"
    pub filter_mode: FilterMode,

    /// How long notifications stay visible, in milliseconds
    pub notification_life_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when RUST_LOG is not set
    pub level: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            use_glyphs: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::Contains,
            notification_life_ms: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;
        config.display.rows_per_page = normalize_rows_per_page(config.display.rows_per_page);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("app-registry").join("config.toml"))
    }

    pub fn notification_life(&self) -> Duration {
        Duration::from_millis(self.behavior.notification_life_ms)
    }

    /// Resolve the directory endpoint: runtime env var, then config file,
    /// then the build-time value, then the fallback
    pub fn api_url(&self) -> String {
        Self::resolve_api_url(std::env::var(API_URL_ENV).ok(), self.api.url.clone())
    }

    fn resolve_api_url(from_env: Option<String>, from_file: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| from_file.filter(|url| !url.trim().is_empty()))
            .or_else(|| BUILD_API_URL.map(str::to_string))
            .unwrap_or_else(|| FALLBACK_API_URL.to_string())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# App Registry Configuration File
# Location: ~/.config/app-registry/config.toml (Linux)
#           ~/Library/Application Support/app-registry/config.toml (macOS)
#           %APPDATA%\app-registry\config.toml (Windows)

[api]
# Directory endpoint returning { "Applications": [...] }
# The URL_API_APPLICATIONS environment variable takes precedence
# url = "http://localhost:5000/api/applications"

[display]
# Rows per page: 5, 10 or 25
rows_per_page = 10

# Use Unicode glyphs for selection markers
use_glyphs = true

[behavior]
# Global filter matching: "contains", "fuzzy" or "regex"
filter_mode = "contains"

# How long notifications stay visible, in milliseconds
notification_life_ms = 3000

[logging]
# Default level when RUST_LOG is not set: "error", "warn", "info", "debug", "trace"
level = "info"
"#
        .to_string()
    }
}
