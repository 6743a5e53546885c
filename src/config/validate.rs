// src/config/validate.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile, MAX_TIMEOUT_MINUTES};
use crate::errors::{CiStatusError, Result};
use crate::notify::ScopeFilter;

// `[host]:port`, host may be empty, a name, an IPv4 or a bracketed IPv6.
static LISTEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\[[0-9A-Fa-f:.]+\]|[A-Za-z0-9.\-]*):(\d{1,5})$").expect("valid listen regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+\S*$").expect("valid url regex"));

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = CiStatusError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let config = ConfigFile::new_unchecked(raw);
        validate_config(&config)?;
        Ok(config)
    }
}

/// Check the invariants of an already defaulted config.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_listen(cfg.listen())?;
    validate_hooks(cfg)?;
    validate_policies(cfg)?;
    Ok(())
}

fn validate_listen(listen: &str) -> Result<()> {
    let port_ok = LISTEN_RE
        .captures(listen)
        .and_then(|c| c[2].parse::<u16>().ok())
        .is_some();
    if !port_ok {
        return Err(CiStatusError::ConfigError(format!(
            "listen address '{}' must look like '[host]:port'",
            listen
        )));
    }
    Ok(())
}

fn validate_hooks(cfg: &ConfigFile) -> Result<()> {
    for hook in cfg.hooks() {
        if !URL_RE.is_match(&hook.url) {
            return Err(CiStatusError::ConfigError(format!(
                "hook url '{}' must be an http(s) URL",
                hook.url
            )));
        }
        if let Err(e) = ScopeFilter::new(&hook.scope) {
            return Err(CiStatusError::ConfigError(format!(
                "hook '{}' has an invalid scope: {:#}",
                hook.url, e
            )));
        }
    }
    Ok(())
}

fn validate_policies(cfg: &ConfigFile) -> Result<()> {
    if cfg.timeout_minutes() > MAX_TIMEOUT_MINUTES {
        return Err(CiStatusError::ConfigError(format!(
            "timeout must be at most {} minutes (got {})",
            MAX_TIMEOUT_MINUTES,
            cfg.timeout_minutes()
        )));
    }
    if cfg.retry_policy().attempts() == 0 {
        return Err(CiStatusError::ConfigError(
            "[retry].attempts must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.poll_interval().is_zero() {
        return Err(CiStatusError::ConfigError(
            "[snapshot].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
