//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Update scheduling configuration
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Printer configuration
    #[serde(default)]
    pub output: OutputSection,

    /// Interface filter configuration
    #[serde(default)]
    pub filter: FilterSection,
}

/// Update scheduling section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Update interval in milliseconds
    pub update_interval: Option<u64>,

    /// Update on kernel link notifications instead of polling
    #[serde(default)]
    pub listen: bool,
}

/// Printer section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Print interval in milliseconds
    pub print_interval: Option<u64>,

    /// Output format: "text" or "json"
    pub format: Option<String>,
}

/// Interface filter section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for interfaces to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for interfaces to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Do not track loopback interfaces
    #[serde(default)]
    pub exclude_loopback: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# ifwatch configuration file

[monitor]
# Period between interface updates in milliseconds (default: 500)
update_interval = 500

# Update on kernel link notifications instead of polling.
# Falls back to polling at update_interval if the listener fails.
# listen = false

[output]
# Period between full table prints in milliseconds (default: 5000)
print_interval = 5000

# Output format: "text" or "json" (default: "text")
# format = "text"

[filter]
# Regex patterns for interfaces to include (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^eth", "^en"]

# Regex patterns for interfaces to exclude
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^docker", "^veth"]

# Do not track loopback interfaces
# exclude_loopback = false
"#
    .to_string()
}
