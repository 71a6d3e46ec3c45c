//! Startup configuration.
//!
//! Fail fast: any config error is fatal before the listener binds.

use std::path::Path;

use crate::config::{load_config, validate_config, ConfigError, MirrorConfig};

/// Load the config file (or defaults) and apply command-line overrides.
pub fn resolve_config(
    path: Option<&Path>,
    bind_override: Option<&str>,
) -> Result<MirrorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => MirrorConfig::default(),
    };

    if let Some(bind) = bind_override {
        config.listener.bind_address = bind.to_string();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    Ok(config)
}
