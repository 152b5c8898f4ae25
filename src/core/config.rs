//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.gallery/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::highlight;
use crate::core::route;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GalleryConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_path: Option<String>,
    pub base_path: Option<String>,
    pub code_theme: Option<String>,
    pub callback_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LinksConfig {
    pub docs_url: Option<String>,
    pub contributors_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
pub const DEFAULT_DOCS_URL: &str = "https://ratatui.rs/";
pub const DEFAULT_CONTRIBUTORS_URL: &str =
    "https://github.com/AnnMarieW/dash-app-gallery/graphs/contributors";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Normalized, always starts and ends with `/`.
    pub base_path: String,
    pub start_path: String,
    pub code_theme: String,
    pub callback_timeout_secs: u64,
    pub log_level: LevelFilter,
    pub docs_url: String,
    pub contributors_url: String,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub path: Option<String>,
    pub theme: Option<String>,
    pub log_level: Option<LevelFilter>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.gallery/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".gallery").join("config.toml"))
}

/// Load config from `~/.gallery/config.toml`.
pub fn load_config() -> Result<GalleryConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(GalleryConfig::default())
        }
    }
}

/// Load config from `path`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `GalleryConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config_from(path: &Path) -> Result<GalleryConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(GalleryConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GalleryConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Example Gallery Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# start_path = "/examples/poisson-distribution"  # Or GALLERY_START_PATH, or --path
# base_path = "/"                                # Or GALLERY_BASE_PATH
# code_theme = "base16-ocean.dark"               # Or GALLERY_CODE_THEME, or --theme
# callback_timeout_secs = 5
# log_level = "debug"                            # Or GALLERY_LOG_LEVEL, or --log-level

# [links]
# docs_url = "https://ratatui.rs/"
# contributors_url = "https://github.com/AnnMarieW/dash-app-gallery/graphs/contributors"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GalleryConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// `resolve` with an explicit environment lookup.
pub fn resolve_with_env(
    config: &GalleryConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base path: env → config → default
    let base_path = route::normalize_base(
        &env("GALLERY_BASE_PATH")
            .or_else(|| config.general.base_path.clone())
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
    );

    // Start path: CLI → env → config → overview
    let start_path = cli
        .path
        .clone()
        .or_else(|| env("GALLERY_START_PATH"))
        .or_else(|| config.general.start_path.clone())
        .unwrap_or_else(|| base_path.clone());

    // Code theme: CLI → env → config → default
    let code_theme = cli
        .theme
        .clone()
        .or_else(|| env("GALLERY_CODE_THEME"))
        .or_else(|| config.general.code_theme.clone())
        .unwrap_or_else(|| highlight::DEFAULT_THEME.to_string());

    // Log level: CLI → env → config → default
    let log_level = cli.log_level.unwrap_or_else(|| {
        env("GALLERY_LOG_LEVEL")
            .or_else(|| config.general.log_level.clone())
            .and_then(|level| parse_level(&level))
            .unwrap_or(DEFAULT_LOG_LEVEL)
    });

    ResolvedConfig {
        base_path,
        start_path,
        code_theme,
        callback_timeout_secs: config
            .general
            .callback_timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS),
        log_level,
        docs_url: config
            .links
            .docs_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DOCS_URL.to_string()),
        contributors_url: config
            .links
            .contributors_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTRIBUTORS_URL.to_string()),
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.parse() {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Unknown log level '{}', using {}", level, DEFAULT_LOG_LEVEL);
            None
        }
    }
}
