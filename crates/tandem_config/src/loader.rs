//! Loading and validating `tandem.toml`.

use crate::error::ConfigError;
use crate::types::TandemConfig;
use std::path::Path;

/// Conventional configuration file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tandem.toml";

/// Loads and validates the configuration at `path`.
pub fn load_config(path: &Path) -> Result<TandemConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `dir/tandem.toml` if it exists, otherwise returns the defaults.
pub fn load_or_default(dir: &Path) -> Result<TandemConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(TandemConfig::default())
    }
}

/// Parses and validates configuration text.
pub fn load_config_from_str(content: &str) -> Result<TandemConfig, ConfigError> {
    let config: TandemConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TandemConfig) -> Result<(), ConfigError> {
    let invalid = |field, reason: &str| {
        Err(ConfigError::Invalid {
            field,
            reason: reason.to_string(),
        })
    };

    if config.toolchain.compiler.trim().is_empty() {
        return invalid("toolchain.compiler", "must not be empty");
    }
    if config.toolchain.runtime.trim().is_empty() {
        return invalid("toolchain.runtime", "must not be empty");
    }
    if config.toolchain.timeout_secs == 0 {
        return invalid("toolchain.timeout_secs", "must be at least 1");
    }
    if config.harness.trials == 0 {
        return invalid("harness.trials", "must be at least 1");
    }
    if config.harness.clock_half_period == 0 {
        return invalid("harness.clock_half_period", "must be at least 1");
    }
    if config.harness.settle_delay == 0 {
        return invalid("harness.settle_delay", "must be at least 1");
    }
    if config.harness.reset_assert == 0 {
        return invalid("harness.reset_assert", "must be at least 1");
    }
    if config.proposer.timeout_secs == 0 {
        return invalid("proposer.timeout_secs", "must be at least 1");
    }
    if matches!(config.proposer.command.as_deref(), Some(c) if c.trim().is_empty()) {
        return invalid("proposer.command", "must not be empty when given");
    }
    if config.orchestrator.max_parallel == Some(0) {
        return invalid("orchestrator.max_parallel", "must be at least 1");
    }
    Ok(())
}
