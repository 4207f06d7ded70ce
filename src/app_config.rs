//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use assetgrab_core::AcceptedExtensions;
use assetgrab_core::download::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use serde::Deserialize;

/// TOML-backed file configuration for assetgrab defaults.
///
/// Every key is optional; CLI flags take precedence over file values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default output directory for downloads.
    pub output_dir: Option<PathBuf>,
    /// Default concurrency (same range as CLI).
    pub concurrency: Option<usize>,
    /// Accepted extensions, e.g. `[".mp4", ".mov", ".webm"]`.
    pub extensions: Option<Vec<String>>,
    /// Post-navigation settle delay in milliseconds.
    pub settle_delay_ms: Option<u64>,
    /// Page navigation timeout in seconds.
    pub navigation_timeout_secs: Option<u64>,
    /// Download client connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Download client idle read timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Explicit Chromium executable.
    pub chromium_path: Option<PathBuf>,
    /// User-Agent override for asset requests and page rendering.
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency)
        {
            bail!(
                "Invalid config value for `concurrency`: {concurrency}. Expected range: {MIN_CONCURRENCY}..={MAX_CONCURRENCY}"
            );
        }

        if let Some(settle) = self.settle_delay_ms
            && settle > 60_000
        {
            bail!("Invalid config value for `settle_delay_ms`: {settle}. Expected range: 0..=60000");
        }

        validate_timeout_secs("navigation_timeout_secs", self.navigation_timeout_secs)?;
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;

        if let Some(extensions) = &self.extensions {
            AcceptedExtensions::new(extensions)
                .context("Invalid config value for `extensions`")?;
        }

        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be blank");
        }

        Ok(())
    }

    /// Accepted extensions from the file, if configured.
    pub fn accepted_extensions(&self) -> Result<Option<AcceptedExtensions>> {
        self.extensions
            .as_ref()
            .map(|list| AcceptedExtensions::new(list).context("Invalid config value for `extensions`"))
            .transpose()
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config; default when no file exists.
    pub config: FileConfig,
    /// Indicates whether configuration was loaded from disk.
    pub loaded_from_file: bool,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/assetgrab/config.toml`
/// 2. `$HOME/.config/assetgrab/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("assetgrab")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("assetgrab")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    match path.as_deref() {
        Some(path_ref) if path_ref.exists() => {
            let config = load_file_config(path_ref)?;
            Ok(LoadedConfig {
                path,
                config,
                loaded_from_file: true,
            })
        }
        _ => Ok(LoadedConfig {
            path,
            config: FileConfig::default(),
            loaded_from_file: false,
        }),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let cfg: FileConfig = toml::from_str(raw)?;
    cfg.validate()?;
    Ok(cfg)
}
