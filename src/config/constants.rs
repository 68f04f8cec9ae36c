//! Configuration constants.
//!
//! Defaults used when the configuration file leaves a setting out.

/// Database path used when `db_path` is not configured
pub const DEFAULT_DB_PATH: &str = "/var/lib/GeoIP/GeoLite2-Country.mmdb";

/// Points handed to the stage per `apply` call by the bundled host
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Largest accepted `--batch-size`
pub const MAX_BATCH_SIZE: usize = 1_000_000;

/// Documented sample configuration, valid TOML for [`GeoIpConfig`](super::GeoIpConfig).
pub const SAMPLE_CONFIG: &str = r#"
## db_path is the location of the MaxMind GeoIP2 City database
db_path = "/var/lib/GeoIP/GeoLite2-City.mmdb"

## db_type is one of "city", "country" or "asn"; empty means "city"
db_type = "city"

[[lookup]]
## read the address from "source_ip" and write the results to the
## destination fields that are set
field = "source_ip"
dest_country = "source_country"
dest_city = "source_city"
dest_lat = "source_lat"
dest_lon = "source_lon"
"#;
