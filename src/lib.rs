//! metric_geoip library: GeoIP enrichment for metric pipelines
//!
//! This library provides a pipeline stage that resolves an IP-address field on
//! each metric point into country, city, coordinates or autonomous-system
//! attributes, looked up in an offline MaxMind database, and writes them back
//! onto the point as new fields.
//!
//! # Example
//!
//! ```no_run
//! use metric_geoip::{EnrichmentStage, GeoIpConfig, Metric, Processor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeoIpConfig::from_toml_str(r#"
//!     db_path = "/var/lib/GeoIP/GeoLite2-City.mmdb"
//!     db_type = "city"
//!
//!     [[lookup]]
//!     field = "source_ip"
//!     dest_country = "source_country"
//!     dest_city = "source_city"
//! "#)?;
//!
//! let stage = EnrichmentStage::initialize(&config)?;
//! let batch = vec![Metric::new("flows").with_field("source_ip", "8.8.8.8")];
//! let batch = stage.apply(batch);
//! println!("{:?}", batch[0].fields);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod enrich;
pub mod error_handling;
pub mod geoip;
pub mod host;
pub mod initialization;
mod metric;

// Re-export public API
pub use config::{GeoIpConfig, HostOptions, LogFormat, LogLevel, LookupSpec};
pub use enrich::{apply_spec, EnrichmentStage, MappingEngine, Processor, SpecOutcome};
pub use error_handling::{ConfigError, DatabaseOpenError, EnrichmentStats, LookupError, LookupOutcome};
pub use geoip::{DatabaseKind, DatabaseOpener, GeoDatabase, GeoRecord};
pub use host::{run_json_lines, HostReport};
pub use metric::{FieldValue, Metric, MetricPoint};
