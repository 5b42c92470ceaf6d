//! Configuration file handling
//!
//! The configuration is a set of named sections, each a flat mapping of string keys
//! to string values. Two sections are used: `jenkins` holds the connection
//! properties and `alias` holds user defined commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const JENKINS_SECTION: &str = "jenkins";
pub const ALIAS_SECTION: &str = "alias";

const DEFAULT_FILENAME: &str = ".jenkins.yaml";

/// Properties that can be saved with `config -save`, and their section
const PROPERTIES: [(&str, &str); 3] = [
    ("host", JENKINS_SECTION),
    ("user", JENKINS_SECTION),
    ("token", JENKINS_SECTION),
];

/// Errors that can occur while reading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to locate the home directory for .jenkins.yaml")]
    HomeNotFound,
    #[error("Unable to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse YAML config file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Unable to parse JSON config file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("Unknown property {0}, expected one of: host, user, token")]
    UnknownProperty(String),
    #[error("Could not base64 decode the token property: {0}")]
    TokenEncoding(String),
}

/// A property to be written to the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub section: &'static str,
    pub name: String,
    pub value: String,
}

impl Property {
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownProperty` if `name` is not a known property.
    pub fn new(name: &str, value: &str) -> Result<Self, ConfigError> {
        PROPERTIES
            .iter()
            .find(|(property, _)| *property == name)
            .map(|&(_, section)| Property {
                section,
                name: name.to_string(),
                value: value.to_string(),
            })
            .ok_or_else(|| ConfigError::UnknownProperty(name.to_string()))
    }

    /// The value as stored at rest, tokens are base64 encoded
    fn stored_value(&self) -> String {
        if self.name == "token" {
            BASE64.encode(&self.value)
        } else {
            self.value.clone()
        }
    }
}

/// Sectioned key/value configuration store
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigStore {
    /// Default configuration path, `~/.jenkins.yaml`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HomeNotFound` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(DEFAULT_FILENAME))
            .ok_or(ConfigError::HomeNotFound)
    }

    /// Loads a configuration file, a missing or empty file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file exists but cannot be read, or
    /// `ConfigError::Yaml`/`ConfigError::Json` if parsing fails.
    pub fn from_file(file: &Path) -> Result<ConfigStore, ConfigError> {
        if !file.exists() {
            debug!("Config file {} does not exist, using defaults", file.display());
            return Ok(ConfigStore::default());
        }
        let contents = std::fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(ConfigStore::default());
        }
        let config: ConfigStore = if is_json(file) {
            serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        debug!("Loaded config file {}", file.display());
        Ok(config)
    }

    /// Writes the configuration, creating the file if needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Write` if the file cannot be written.
    pub fn save(&self, file: &Path) -> Result<(), ConfigError> {
        let contents = if is_json(file) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json {
                source: e,
                path: file.to_path_buf(),
            })?
        } else {
            serde_yaml::to_string(self).map_err(|e| ConfigError::Yaml {
                source: e,
                path: file.to_path_buf(),
            })?
        };
        std::fs::write(file, contents).map_err(|source| ConfigError::Write {
            path: file.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|values| values.get(key))
            .map(String::as_str)
    }

    pub fn set(&mut self, section: &str, key: &str, value: String) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    pub fn set_property(&mut self, property: &Property) {
        self.set(property.section, &property.name, property.stored_value());
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.get(JENKINS_SECTION, "host").unwrap_or_default()
    }

    #[must_use]
    pub fn user(&self) -> &str {
        self.get(JENKINS_SECTION, "user").unwrap_or_default()
    }

    /// The decoded API token.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TokenEncoding` if the stored token is not valid base64 text.
    pub fn token(&self) -> Result<String, ConfigError> {
        let encoded = self.get(JENKINS_SECTION, "token").unwrap_or_default();
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| ConfigError::TokenEncoding(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ConfigError::TokenEncoding(e.to_string()))
    }

    /// Raw alias definitions, name to value
    #[must_use]
    pub fn aliases(&self) -> BTreeMap<String, String> {
        self.sections
            .get(ALIAS_SECTION)
            .cloned()
            .unwrap_or_default()
    }
}

fn is_json(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "json")
}
