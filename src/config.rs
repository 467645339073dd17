//! Loading sheet configuration from TOML.
//!
//! ```toml
//! [limits]
//! max_rows = 1000
//! max_cols = 26
//! ```

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use sheetcalc_core::SheetConfig;

use crate::error::Result;

/// Default location of the config file, e.g. `~/.config/sheetcalc/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "sheetcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Parse configuration from TOML text. Missing keys take their defaults.
pub fn parse_config(content: &str) -> Result<SheetConfig> {
    let config: SheetConfig = toml::from_str(content)?;
    Ok(config.normalized())
}

/// Load configuration from `path`, or from [`default_config_path`] if `None`.
///
/// A missing default file yields the default configuration; a missing
/// explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<SheetConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => {
                log::debug!("no config file found, using defaults");
                return Ok(SheetConfig::default());
            }
        },
    };
    let content = std::fs::read_to_string(&path)?;
    log::debug!("loaded config from {}", path.display());
    parse_config(&content)
}
