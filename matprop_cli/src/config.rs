//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>` on the command line
//! 2. `$MATPROP_CONFIG` environment variable
//! 3. `<platform config dir>/matprop/config.toml`
//! 4. Built-in defaults (everything is optional)
//!
//! ```toml
//! [solver]
//! pivot_tolerance = 1e-10
//!
//! [crystal]
//! wavelength_angstrom = 1.5406
//! max_index = 4
//!
//! [output]
//! precision = 4
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use matprop_core::CalcSettings;
use serde::Deserialize;
use tracing::debug;

pub const CONFIG_ENV: &str = "MATPROP_CONFIG";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Calculation defaults (`[solver]`, `[regression]`, `[crystal]`, ...)
    #[serde(flatten)]
    pub calc: CalcSettings,
    pub output: OutputConfig,
}

/// Text output settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Digits after the decimal point
    pub precision: usize,
    /// Emit JSON even without `--json`
    pub json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: 4,
            json: false,
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => config_path(),
    };

    match path {
        Some(p) if p.exists() => load_config_from(&p),
        Some(p) if explicit.is_some() => anyhow::bail!("config file {} does not exist", p.display()),
        _ => Ok(Config::default()),
    }
}

/// Parse and validate a specific config file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    config
        .calc
        .validate()
        .with_context(|| format!("invalid settings in {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    resolve_config_path(std::env::var(CONFIG_ENV).ok(), default_config_dir())
}

fn resolve_config_path(env_value: Option<String>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(p) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(p));
    }
    config_dir.map(|dir| dir.join("config.toml"))
}

fn default_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "matprop", "matprop").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Show the active config path (for `matprop config`).
pub fn show_config_path(explicit: Option<&Path>) -> String {
    let path = explicit.map(Path::to_path_buf).or_else(config_path);
    match path {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
