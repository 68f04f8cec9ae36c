//! Error type definitions.
//!
//! This module defines the error types surfaced by initialization and the
//! per-lookup outcomes recorded during enrichment.

use std::path::PathBuf;

use log::SetLoggerError;
use maxminddb::MaxMindDBError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::geoip::DatabaseKind;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Configuration and stage initialization errors.
///
/// Every variant is fatal to [`EnrichmentStage::initialize`](crate::EnrichmentStage::initialize).
/// `UnsupportedKind` is also produced (and only logged) during enrichment if a
/// stage ever holds a kind it cannot dispatch.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `db_type` is not one of `""`, `city`, `country` or `asn`.
    #[error("Invalid GeoIP database type specified: {0}")]
    InvalidDbType(String),

    /// The active database kind has no lookup path.
    #[error("Invalid GeoIP database type specified: {0}")]
    UnsupportedKind(String),

    /// The database file could not be opened or is not usable for the kind.
    #[error("Error opening GeoIP database {}: {source}", .path.display())]
    DatabaseOpen {
        path: PathBuf,
        #[source]
        source: DatabaseOpenError,
    },

    /// The configuration file could not be read.
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this stage.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Underlying cause of a database open failure.
#[derive(Error, Debug)]
pub enum DatabaseOpenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid MaxMind database: {0}")]
    Format(#[from] MaxMindDBError),

    /// The file is a valid MaxMind database but of the wrong edition.
    #[error("database type {database_type:?} cannot serve {kind} lookups")]
    UnsupportedDatabaseType {
        kind: DatabaseKind,
        database_type: String,
    },
}

/// Outcome of a failed database lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The address has no entry in the database. Expected; never logged.
    #[error("not found")]
    NotFound,

    /// The database handle cannot serve lookups of this kind.
    #[error("database cannot serve {0} lookups")]
    UnsupportedKind(DatabaseKind),

    /// Any other failure while querying or decoding a record.
    #[error("{0}")]
    Database(String),
}

impl From<MaxMindDBError> for LookupError {
    fn from(err: MaxMindDBError) -> Self {
        match err {
            MaxMindDBError::AddressNotFoundError(_) => LookupError::NotFound,
            other => LookupError::Database(other.to_string()),
        }
    }
}

/// What happened to one (point, lookup spec) pair.
///
/// Used as the key of [`EnrichmentStats`](super::EnrichmentStats) counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum LookupOutcome {
    /// A record was found and the configured destinations were written.
    Enriched,
    /// The address is not in the database.
    NotFound,
    /// The source value is a string but not an IP address.
    InvalidAddress,
    /// The source field holds a number or boolean.
    NonStringValue,
    /// The point does not carry the source field.
    MissingField,
    /// The lookup spec has an empty source field.
    InertSpec,
    /// The database reported an error other than "not found".
    LookupFailed,
    /// The stage holds a kind it cannot dispatch.
    UnsupportedKind,
}

impl std::fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Enriched => "enriched",
            LookupOutcome::NotFound => "address not found",
            LookupOutcome::InvalidAddress => "invalid address",
            LookupOutcome::NonStringValue => "non-string source value",
            LookupOutcome::MissingField => "missing source field",
            LookupOutcome::InertSpec => "lookup without source field",
            LookupOutcome::LookupFailed => "lookup error",
            LookupOutcome::UnsupportedKind => "unsupported database type",
        }
    }

    /// Whether this outcome is logged at error severity.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            LookupOutcome::LookupFailed | LookupOutcome::UnsupportedKind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_not_found_is_distinguished() {
        let err = LookupError::from(MaxMindDBError::AddressNotFoundError(
            "Address not found in database".to_string(),
        ));
        assert_eq!(err, LookupError::NotFound);
    }

    #[test]
    fn test_other_maxmind_errors_are_generic() {
        let err = LookupError::from(MaxMindDBError::InvalidDatabaseError(
            "bad pointer".to_string(),
        ));
        match err {
            LookupError::Database(msg) => assert!(msg.contains("bad pointer")),
            other => panic!("Invalid database should be a generic error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_db_type_message() {
        let err = ConfigError::InvalidDbType("bogus".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid GeoIP database type specified: bogus"
        );
    }

    #[test]
    fn test_database_open_message_includes_path_and_cause() {
        let err = ConfigError::DatabaseOpen {
            path: PathBuf::from("/nope/GeoLite2-City.mmdb"),
            source: DatabaseOpenError::UnsupportedDatabaseType {
                kind: DatabaseKind::Asn,
                database_type: "GeoLite2-City".to_string(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/GeoLite2-City.mmdb"), "got: {}", msg);
        assert!(msg.contains("GeoLite2-City"), "got: {}", msg);
        assert!(msg.contains("asn"), "got: {}", msg);
    }

    #[test]
    fn test_only_failures_are_errors() {
        let errors: Vec<_> = LookupOutcome::iter().filter(|o| o.is_error()).collect();
        assert_eq!(
            errors,
            vec![LookupOutcome::LookupFailed, LookupOutcome::UnsupportedKind]
        );
    }

    #[test]
    fn test_outcome_display_is_unique() {
        let mut labels: Vec<_> = LookupOutcome::iter().map(|o| o.to_string()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), LookupOutcome::iter().count());
    }
}
