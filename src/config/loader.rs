// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "ci-status.toml";

/// Read a TOML config file, apply defaults and validate.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawConfigFile = toml::from_str(&contents)?;
    ConfigFile::try_from(raw)
}
