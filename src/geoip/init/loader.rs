//! GeoIP database loading from files.

use maxminddb::Reader;
use std::path::Path;

use crate::error_handling::DatabaseOpenError;
use crate::geoip::metadata::{extract_metadata, verify_database_type};
use crate::geoip::types::{DatabaseKind, GeoIpMetadata};

/// Loads a GeoIP database from a local file path and checks that its edition
/// can serve `kind`.
pub(crate) fn load_from_file(
    path: &Path,
    kind: DatabaseKind,
) -> Result<(Reader<Vec<u8>>, GeoIpMetadata), DatabaseOpenError> {
    log::debug!("Loading GeoIP {} database from: {}", kind, path.display());

    let db_bytes = std::fs::read(path)?;
    let reader = Reader::from_source(db_bytes)?;

    let metadata = extract_metadata(&reader, &path.to_string_lossy());
    verify_database_type(kind, &metadata)?;

    log::info!(
        "Loaded GeoIP database {} ({}, build {})",
        metadata.source,
        metadata.database_type,
        metadata.build_epoch
    );

    Ok((reader, metadata))
}
