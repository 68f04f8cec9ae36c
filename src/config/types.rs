//! Configuration types and CLI options.
//!
//! This module defines the stage configuration loaded from TOML and the enums
//! used for command-line logging options.

use std::path::{Path, PathBuf};

use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use thiserror::Error;

use crate::config::constants::{DEFAULT_BATCH_SIZE, DEFAULT_DB_PATH, MAX_BATCH_SIZE};
use crate::error_handling::ConfigError;
use crate::geoip::DatabaseKind;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// One declared mapping from a source field to destination fields.
///
/// An empty destination means "do not emit that attribute". A spec with an
/// empty `field` is inert.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LookupSpec {
    /// Field holding the IP address
    pub field: String,
    #[serde(default)]
    pub dest_country: String,
    #[serde(default)]
    pub dest_city: String,
    #[serde(default)]
    pub dest_lat: String,
    #[serde(default)]
    pub dest_lon: String,
    #[serde(default, rename = "asn")]
    pub dest_asn: String,
    #[serde(default, rename = "asn_org")]
    pub dest_asn_org: String,
}

impl LookupSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }

    pub fn is_inert(&self) -> bool {
        self.field.is_empty()
    }

    /// Destination names this spec configures that `kind` can populate.
    pub fn destinations_for(&self, kind: DatabaseKind) -> Vec<&str> {
        let candidates = match kind {
            DatabaseKind::City => vec![
                &self.dest_country,
                &self.dest_city,
                &self.dest_lat,
                &self.dest_lon,
            ],
            DatabaseKind::Country => vec![&self.dest_country],
            DatabaseKind::Asn => vec![&self.dest_asn, &self.dest_asn_org],
        };
        candidates
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(String::as_str)
            .collect()
    }

    /// Destination names this spec configures that `kind` will never write.
    pub fn ignored_destinations(&self, kind: DatabaseKind) -> Vec<&str> {
        let all = [
            &self.dest_country,
            &self.dest_city,
            &self.dest_lat,
            &self.dest_lon,
            &self.dest_asn,
            &self.dest_asn_org,
        ];
        let used = self.destinations_for(kind);
        all.into_iter()
            .map(String::as_str)
            .filter(|name| !name.is_empty() && !used.contains(name))
            .collect()
    }
}

/// A configuration value that prevents the stage from starting.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {message}")]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

/// GeoIP stage configuration.
///
/// # Examples
///
/// ```
/// use metric_geoip::GeoIpConfig;
///
/// let config = GeoIpConfig::from_toml_str(r#"
///     db_path = "/var/lib/GeoIP/GeoLite2-ASN.mmdb"
///     db_type = "asn"
///
///     [[lookup]]
///     field = "source_ip"
///     asn = "source_asn"
///     asn_org = "source_asn_org"
/// "#).unwrap();
/// assert_eq!(config.lookup.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoIpConfig {
    /// Location of the `.mmdb` file
    pub db_path: PathBuf,

    /// `city`, `country`, `asn`, or empty for city
    pub db_type: String,

    /// Mappings, applied in declaration order
    pub lookup: Vec<LookupSpec>,
}

impl Default for GeoIpConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            db_type: String::new(),
            lookup: Vec::new(),
        }
    }
}

impl GeoIpConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks settings that would make initialization fail.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if DatabaseKind::from_db_type(&self.db_type).is_err() {
            return Err(ConfigValidationError {
                field: "db_type".to_string(),
                message: format!(
                    "unknown database type {:?}; expected \"city\", \"country\" or \"asn\"",
                    self.db_type
                ),
            });
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigValidationError {
                field: "db_path".to_string(),
                message: "database path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Non-fatal findings worth telling the operator about.
    pub fn warnings(&self) -> Vec<String> {
        let Ok(kind) = DatabaseKind::from_db_type(&self.db_type) else {
            return Vec::new();
        };

        let mut warnings = Vec::new();
        if self.lookup.is_empty() {
            warnings.push("no lookups configured; points pass through unchanged".to_string());
        }
        for (i, spec) in self.lookup.iter().enumerate() {
            if spec.is_inert() {
                warnings.push(format!("lookup[{}] has an empty field and is ignored", i));
                continue;
            }
            if spec.destinations_for(kind).is_empty() {
                warnings.push(format!(
                    "lookup[{}] ({}) sets no destination a {} database can fill",
                    i, spec.field, kind
                ));
            }
            let ignored = spec.ignored_destinations(kind);
            if !ignored.is_empty() {
                warnings.push(format!(
                    "lookup[{}] ({}) destinations {:?} are ignored for a {} database",
                    i, spec.field, ignored, kind
                ));
            }
        }
        warnings
    }
}

/// Command-line options of the bundled pipeline host.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "metric_geoip",
    about = "Enrich newline-delimited JSON metrics with GeoIP fields"
)]
pub struct HostOptions {
    /// TOML configuration file (db_path, db_type, [[lookup]] entries)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Overrides db_path from the configuration file
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Overrides db_type from the configuration file
    #[arg(long)]
    pub db_type: Option<String>,

    /// Read metrics from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Points per batch handed to the stage
    #[arg(
        long,
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BATCH_SIZE as u64)
    )]
    pub batch_size: usize,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Print a sample configuration and exit
    #[arg(long)]
    pub sample_config: bool,
}

impl HostOptions {
    /// Loads the configuration file (or defaults) and applies CLI overrides.
    pub fn load_config(&self) -> Result<GeoIpConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GeoIpConfig::from_file(path)?,
            None => GeoIpConfig::default(),
        };
        if let Some(db_path) = &self.db_path {
            config.db_path = db_path.clone();
        }
        if let Some(db_type) = &self.db_type {
            config.db_type = db_type.clone();
        }
        Ok(config)
    }
}
