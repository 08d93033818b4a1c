//! User configuration (`config.toml`).

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabula_core::document::DEFAULT_VERSION;
use tabula_core::{Normalizer, Spreadsheet, Validator};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Version tag written to and required from sheet files.
    pub version: String,
    pub normalize: NameCase,
    /// Longest accepted cell name, in characters.
    pub max_name_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: DEFAULT_VERSION.to_string(),
            normalize: NameCase::default(),
            max_name_len: None,
        }
    }
}

/// How cell names are normalized.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameCase {
    #[default]
    #[serde(rename = "none")]
    AsWritten,
    Upper,
    Lower,
}

impl Config {
    pub fn normalizer(&self) -> Normalizer {
        match self.normalize {
            NameCase::AsWritten => Arc::new(|name: &str| name.to_string()),
            NameCase::Upper => Arc::new(|name: &str| name.to_uppercase()),
            NameCase::Lower => Arc::new(|name: &str| name.to_lowercase()),
        }
    }

    pub fn validator(&self) -> Validator {
        match self.max_name_len {
            Some(max) => Arc::new(move |name: &str| name.chars().count() <= max),
            None => Arc::new(|_: &str| true),
        }
    }

    pub fn new_sheet(&self) -> Spreadsheet {
        Spreadsheet::with_options(self.validator(), self.normalizer(), &self.version)
    }

    pub fn open_sheet(&self, path: &Path) -> tabula_core::Result<Spreadsheet> {
        Spreadsheet::from_file(path, self.validator(), self.normalizer(), &self.version)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tabula")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Resolve the configuration for this run.
///
/// An explicit file must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>, no_config: bool) -> Result<Config> {
    if no_config {
        return Ok(Config::default());
    }
    if let Some(path) = explicit {
        return read_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        bail!(
            "Refusing to read {}: config too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        );
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}
