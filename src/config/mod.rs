pub mod schema;

use std::path::{Path, PathBuf};

use crate::error::{Result, StacheError};

pub use schema::{ContextConfig, HelpersConfig, UserConfig};

/// Get the path to the default user config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stache").join("config.toml"))
}

/// Load user settings.
///
/// With an explicit `path` the file must exist. Otherwise the default
/// location is tried and a missing file yields the defaults.
pub fn load_user_config(path: Option<&Path>) -> Result<UserConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(UserConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|e| StacheError::Io {
        context: format!("reading settings file {}", path.display()),
        source: e,
    })?;

    parse_user_config(&content, &path)
}

fn parse_user_config(content: &str, path: &Path) -> Result<UserConfig> {
    toml::from_str(content).map_err(|e| StacheError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}
