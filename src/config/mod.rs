// src/config/mod.rs

//! Configuration loading and validation for ci-status.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Apply defaults and validate (`validate.rs`).
//!
//! The result is an immutable [`ConfigFile`] that callers pass explicitly to
//! the engine; there is no global config.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, DEFAULT_CONFIG_PATH};
pub use model::{
    ConfigFile, HookConfig, RawConfigFile, RetrySection, SnapshotSection,
    DEFAULT_LISTEN, DEFAULT_TIMEOUT_MINUTES, MAX_TIMEOUT_MINUTES,
};
pub use validate::validate_config;
