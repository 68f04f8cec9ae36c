//! GeoIP lookup using MaxMind GeoIP2 / GeoLite2 databases.
//!
//! This module provides the database seam used by the enrichment stage: the
//! closed set of database kinds, the per-kind records, the [`GeoDatabase`]
//! and [`DatabaseOpener`] traits, and the MaxMind-backed implementations.

mod database;
mod init;
mod lookup;
mod metadata;
mod types;

// Re-export public API
pub use database::{lookup_record, DatabaseOpener, GeoDatabase};
pub use init::MaxMindOpener;
pub use lookup::{parse_address, MaxMindDatabase};
pub use types::{AsnRecord, CityRecord, CountryRecord, DatabaseKind, GeoIpMetadata, GeoRecord};

/// Locale used for city names
pub const CITY_NAME_LOCALE: &str = "en";
