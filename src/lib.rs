//! Command line client for Jenkins
//!
//! Lists and filters jobs, starts jobs with parameters and keeps the connection
//! settings in a configuration file. The configuration may also define aliases:
//! new top level commands that either stand for a built-in command or evaluate
//! a shell expression.

use std::path::{Path, PathBuf};

use log::debug;

use crate::commands::registry::CommandRegistry;
use crate::commands::{alias, builtin_commands};
use crate::config_file::{ConfigError, ConfigStore};

pub mod commands;
pub mod config_file;
pub mod jenkins;
pub mod logger;

/// Load configuration from `config_file` (or `~/.jenkins.yaml`), returning it with its path.
///
/// # Errors
///
/// Returns `ConfigError` if the home directory is unknown or the file cannot be
/// read or parsed.
pub fn load_config(config_file: Option<&Path>) -> Result<(ConfigStore, PathBuf), ConfigError> {
    let config_path = match config_file {
        Some(file) => file.to_path_buf(),
        None => ConfigStore::default_path()?,
    };
    debug!("Loading config from {}", config_path.display());
    let config = ConfigStore::from_file(&config_path)?;
    Ok((config, config_path))
}

/// Build the command table for this invocation: built-ins plus the configured aliases.
#[must_use]
pub fn load_registry(config: &ConfigStore) -> CommandRegistry {
    let builtins = builtin_commands();
    let aliases = alias::resolve(&config.aliases(), &builtins);
    debug!("Resolved {} alias(es)", aliases.len());
    CommandRegistry::new(builtins, aliases)
}
