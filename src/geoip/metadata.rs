//! Metadata for opened GeoIP databases.

use maxminddb::Reader;

use super::types::{DatabaseKind, GeoIpMetadata};
use crate::error_handling::DatabaseOpenError;

/// Extracts metadata from a GeoIP database
pub(crate) fn extract_metadata<T: AsRef<[u8]>>(reader: &Reader<T>, source: &str) -> GeoIpMetadata {
    GeoIpMetadata {
        source: source.to_string(),
        database_type: reader.metadata.database_type.clone(),
        build_epoch: reader.metadata.build_epoch,
        ip_version: reader.metadata.ip_version,
    }
}

/// Rejects databases whose edition cannot serve `kind`.
pub(crate) fn verify_database_type(
    kind: DatabaseKind,
    metadata: &GeoIpMetadata,
) -> Result<(), DatabaseOpenError> {
    if kind.accepts(&metadata.database_type) {
        Ok(())
    } else {
        Err(DatabaseOpenError::UnsupportedDatabaseType {
            kind,
            database_type: metadata.database_type.clone(),
        })
    }
}
