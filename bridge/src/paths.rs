/// Canonical file locations for the bridge.
///
/// The config file lives under the per-user application data directory:
///   - Windows:   %APPDATA%\MSAgentBridge\config.toml
///   - elsewhere: $HOME/.config/MSAgentBridge/config.toml
use anyhow::{bail, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "MSAgentBridge";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the bridge's application data directory.
pub fn app_data_dir() -> Result<PathBuf> {
    if let Some(appdata) = std::env::var_os("APPDATA") {
        return Ok(PathBuf::from(appdata).join(APP_DIR_NAME));
    }
    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME));
    }
    bail!("Neither APPDATA nor HOME is set; pass --config explicitly")
}

/// Returns the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join(CONFIG_FILE_NAME))
}
