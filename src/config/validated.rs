//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::network::InterfaceKind;
use crate::network::filter::{FilterChain, KindFilter, NameRegexFilter};
use crate::output::OutputFormat;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Period between interface updates (also the fallback period when listening)
    pub update_interval: Duration,

    /// Whether updates are driven by kernel link notifications
    pub listen: bool,

    /// Period between full table prints
    pub print_interval: Duration,

    /// Printer output format
    pub format: OutputFormat,

    /// Interface filter applied before any per-interface query
    pub filter: FilterChain,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ update_interval: {}ms, listen: {}, print_interval: {}ms, format: {}, \
             filters: {}+{} }}",
            self.update_interval.as_millis(),
            self.listen,
            self.print_interval.as_millis(),
            self.format,
            self.filter.include_count(),
            self.filter.exclude_count(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Regex patterns are invalid
    /// - Interval values are zero
    /// - The output format is unknown
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let update_interval = resolve_interval(
            cli.update_interval,
            toml.and_then(|t| t.monitor.update_interval),
            defaults::UPDATE_INTERVAL_MS,
            field::UPDATE_INTERVAL,
        )?;

        let print_interval = resolve_interval(
            cli.print_interval,
            toml.and_then(|t| t.output.print_interval),
            defaults::PRINT_INTERVAL_MS,
            field::PRINT_INTERVAL,
        )?;

        let format = Self::resolve_format(cli, toml)?;
        let filter = Self::build_filter(cli, toml)?;

        // Flags only enable
        let listen = cli.listen || toml.is_some_and(|t| t.monitor.listen);

        Ok(Self {
            update_interval,
            listen,
            print_interval,
            format,
            filter,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_format(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        if let Some(format) = cli.format {
            return Ok(format.into());
        }

        toml.and_then(|t| t.output.format.as_deref())
            .map_or(Ok(OutputFormat::default()), parse_format)
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        let mut filter = FilterChain::new();

        let exclude_loopback =
            cli.exclude_loopback || toml.is_some_and(|t| t.filter.exclude_loopback);
        if exclude_loopback {
            filter = filter.exclude(KindFilter::new([InterfaceKind::Loopback]));
        }

        // CLI patterns replace TOML patterns, per list
        let includes = if cli.include.is_empty() {
            toml.map_or(&[][..], |t| t.filter.include.as_slice())
        } else {
            cli.include.as_slice()
        };
        for pattern in includes {
            filter = filter.include(compile(pattern)?);
        }

        let excludes = if cli.exclude.is_empty() {
            toml.map_or(&[][..], |t| t.filter.exclude.as_slice())
        } else {
            cli.exclude.as_slice()
        };
        for pattern in excludes {
            filter = filter.exclude(compile(pattern)?);
        }

        Ok(filter)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn resolve_interval(
    cli: Option<u64>,
    toml: Option<u64>,
    default_ms: u64,
    field: &'static str,
) -> Result<Duration, ConfigError> {
    // Priority: CLI explicit > TOML > default
    let millis = cli.or(toml).unwrap_or(default_ms);

    if millis == 0 {
        return Err(ConfigError::zero_duration(field));
    }

    Ok(Duration::from_millis(millis))
}

fn parse_format(s: &str) -> Result<OutputFormat, ConfigError> {
    match s.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(ConfigError::InvalidFormat {
            value: s.to_string(),
        }),
    }
}

fn compile(pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}
