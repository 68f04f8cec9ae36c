//! GeoIP database initialization.
//!
//! [`MaxMindOpener`] is the production [`DatabaseOpener`]: it reads a `.mmdb`
//! file into memory and hands back a [`MaxMindDatabase`] bound to one kind.

mod loader;

use std::path::Path;

use crate::error_handling::DatabaseOpenError;
use crate::geoip::database::{DatabaseOpener, GeoDatabase};
use crate::geoip::lookup::MaxMindDatabase;
use crate::geoip::types::DatabaseKind;

use loader::load_from_file;

/// Opens MaxMind GeoIP2 / GeoLite2 databases from local files.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxMindOpener;

impl MaxMindOpener {
    fn open_kind(
        &self,
        path: &Path,
        kind: DatabaseKind,
    ) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        let (reader, metadata) = load_from_file(path, kind)?;
        Ok(Box::new(MaxMindDatabase::new(reader, kind, metadata)))
    }
}

impl DatabaseOpener for MaxMindOpener {
    fn open_city(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_kind(path, DatabaseKind::City)
    }

    fn open_country(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_kind(path, DatabaseKind::Country)
    }

    fn open_asn(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_kind(path, DatabaseKind::Asn)
    }
}
