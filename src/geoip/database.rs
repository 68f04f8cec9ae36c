//! Database seams: per-kind lookups and per-kind factories.

use std::net::IpAddr;
use std::path::Path;

use super::types::{AsnRecord, CityRecord, CountryRecord, DatabaseKind, GeoIpMetadata, GeoRecord};
use crate::error_handling::{DatabaseOpenError, LookupError};

/// A read-only GeoIP database.
///
/// Implementations must allow concurrent lookups (`Send + Sync`); a stage
/// shares one handle across every batch. Each lookup either returns the
/// record for its kind, [`LookupError::NotFound`], or another error. A handle
/// that does not serve a kind keeps the default, which reports
/// [`LookupError::UnsupportedKind`].
pub trait GeoDatabase: Send + Sync {
    fn lookup_city(&self, _ip: IpAddr) -> Result<CityRecord, LookupError> {
        Err(LookupError::UnsupportedKind(DatabaseKind::City))
    }

    fn lookup_country(&self, _ip: IpAddr) -> Result<CountryRecord, LookupError> {
        Err(LookupError::UnsupportedKind(DatabaseKind::Country))
    }

    fn lookup_asn(&self, _ip: IpAddr) -> Result<AsnRecord, LookupError> {
        Err(LookupError::UnsupportedKind(DatabaseKind::Asn))
    }

    /// Metadata captured when the database was opened, if any.
    fn metadata(&self) -> Option<&GeoIpMetadata> {
        None
    }
}

/// Looks `ip` up with the operation matching `kind`.
pub fn lookup_record(
    db: &dyn GeoDatabase,
    kind: DatabaseKind,
    ip: IpAddr,
) -> Result<GeoRecord, LookupError> {
    match kind {
        DatabaseKind::City => db.lookup_city(ip).map(GeoRecord::City),
        DatabaseKind::Country => db.lookup_country(ip).map(GeoRecord::Country),
        DatabaseKind::Asn => db.lookup_asn(ip).map(GeoRecord::Asn),
    }
}

/// Opens databases, one factory per kind.
pub trait DatabaseOpener {
    fn open_city(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError>;

    fn open_country(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError>;

    fn open_asn(&self, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError>;

    /// Dispatches to the factory matching `kind`.
    fn open(&self, kind: DatabaseKind, path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        match kind {
            DatabaseKind::City => self.open_city(path),
            DatabaseKind::Country => self.open_country(path),
            DatabaseKind::Asn => self.open_asn(path),
        }
    }
}
