//! GeoIP data structures.
//!
//! This module defines the database kinds, the per-kind lookup records and the
//! metadata captured when a database is opened.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error_handling::ConfigError;

/// Which MaxMind schema the active database follows.
///
/// Exactly one kind is active per stage; it is chosen at initialization and
/// never changes afterwards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    City,
    Country,
    Asn,
}

impl DatabaseKind {
    /// Resolves a configured `db_type`. The empty string selects [`DatabaseKind::City`].
    ///
    /// Matching is exact: `"City"` or `" city"` are rejected.
    pub fn from_db_type(db_type: &str) -> Result<Self, ConfigError> {
        if db_type.is_empty() {
            return Ok(DatabaseKind::City);
        }
        db_type
            .parse()
            .map_err(|_| ConfigError::InvalidDbType(db_type.to_string()))
    }

    /// Whether a MaxMind `database_type` metadata string can serve this kind.
    ///
    /// City lookups need a City or Enterprise edition, country lookups a
    /// Country edition, ASN lookups an ASN or ISP edition.
    pub fn accepts(&self, database_type: &str) -> bool {
        match self {
            DatabaseKind::City => {
                database_type.contains("City") || database_type.contains("Enterprise")
            }
            DatabaseKind::Country => database_type.contains("Country"),
            DatabaseKind::Asn => database_type.contains("ASN") || database_type.contains("ISP"),
        }
    }
}

/// City lookup result. Attributes missing from the record are empty / zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CityRecord {
    pub country_iso_code: String,
    /// City name in the [`CITY_NAME_LOCALE`](super::CITY_NAME_LOCALE) locale.
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Country lookup result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryRecord {
    pub country_iso_code: String,
}

/// ASN lookup result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AsnRecord {
    pub number: u32,
    pub organization: String,
}

/// A lookup record tagged with the kind that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoRecord {
    City(CityRecord),
    Country(CountryRecord),
    Asn(AsnRecord),
}

/// Metadata about the opened GeoIP database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoIpMetadata {
    /// Source path
    pub source: String,
    /// Edition name, e.g. `GeoLite2-City`
    pub database_type: String,
    /// Database build time (seconds since the epoch)
    pub build_epoch: u64,
    /// 4 or 6
    pub ip_version: u16,
}
