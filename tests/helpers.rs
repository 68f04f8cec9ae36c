// Shared test helpers: an in-memory GeoIP database, a counting opener and a
// log capture that records messages per test thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use metric_geoip::geoip::{AsnRecord, CityRecord, CountryRecord};
use metric_geoip::{DatabaseOpenError, DatabaseOpener, GeoDatabase, LookupError};

/// In-memory database. Addresses absent from every map are "not found";
/// addresses in `failing` return a generic lookup error.
#[derive(Clone, Default)]
pub struct FakeGeoDb {
    pub cities: HashMap<IpAddr, CityRecord>,
    pub countries: HashMap<IpAddr, CountryRecord>,
    pub asns: HashMap<IpAddr, AsnRecord>,
    pub failing: Vec<IpAddr>,
}

#[allow(dead_code)] // Not every test file uses every builder
impl FakeGeoDb {
    pub fn with_city(mut self, ip: &str, country: &str, city: &str, lat: f64, lon: f64) -> Self {
        self.cities.insert(
            ip.parse().expect("Invalid test IP"),
            CityRecord {
                country_iso_code: country.to_string(),
                city_name: city.to_string(),
                latitude: lat,
                longitude: lon,
            },
        );
        self
    }

    pub fn with_country(mut self, ip: &str, country: &str) -> Self {
        self.countries.insert(
            ip.parse().expect("Invalid test IP"),
            CountryRecord {
                country_iso_code: country.to_string(),
            },
        );
        self
    }

    pub fn with_asn(mut self, ip: &str, number: u32, organization: &str) -> Self {
        self.asns.insert(
            ip.parse().expect("Invalid test IP"),
            AsnRecord {
                number,
                organization: organization.to_string(),
            },
        );
        self
    }

    pub fn failing_on(mut self, ip: &str) -> Self {
        self.failing.push(ip.parse().expect("Invalid test IP"));
        self
    }

    fn check_failing(&self, ip: IpAddr) -> Result<(), LookupError> {
        if self.failing.contains(&ip) {
            Err(LookupError::Database("unexpected end of search tree".to_string()))
        } else {
            Ok(())
        }
    }
}

impl GeoDatabase for FakeGeoDb {
    fn lookup_city(&self, ip: IpAddr) -> Result<CityRecord, LookupError> {
        self.check_failing(ip)?;
        self.cities.get(&ip).cloned().ok_or(LookupError::NotFound)
    }

    fn lookup_country(&self, ip: IpAddr) -> Result<CountryRecord, LookupError> {
        self.check_failing(ip)?;
        self.countries.get(&ip).cloned().ok_or(LookupError::NotFound)
    }

    fn lookup_asn(&self, ip: IpAddr) -> Result<AsnRecord, LookupError> {
        self.check_failing(ip)?;
        self.asns.get(&ip).cloned().ok_or(LookupError::NotFound)
    }
}

/// Opener that hands out a copy of one fake database and counts open calls.
#[derive(Default)]
pub struct FakeOpener {
    pub db: FakeGeoDb,
    pub opens: AtomicUsize,
}

#[allow(dead_code)]
impl FakeOpener {
    pub fn new(db: FakeGeoDb) -> Self {
        Self {
            db,
            opens: AtomicUsize::new(0),
        }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    fn open_fake(&self) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.db.clone()))
    }
}

impl DatabaseOpener for FakeOpener {
    fn open_city(&self, _path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_fake()
    }

    fn open_country(&self, _path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_fake()
    }

    fn open_asn(&self, _path: &Path) -> Result<Box<dyn GeoDatabase>, DatabaseOpenError> {
        self.open_fake()
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|c| {
            c.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Installs the capturing logger (once per test binary) and clears this
/// thread's captured messages. Each test runs on its own thread, so captures
/// do not leak between tests.
#[allow(dead_code)]
pub fn start_log_capture() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("Another logger is already installed");
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|c| c.borrow_mut().clear());
}

/// Error-level messages logged on this thread since `start_log_capture`.
#[allow(dead_code)]
pub fn captured_errors() -> Vec<String> {
    CAPTURED.with(|c| {
        c.borrow()
            .iter()
            .filter(|(level, _)| *level == log::Level::Error)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}

/// Every message logged on this thread since `start_log_capture`.
#[allow(dead_code)]
pub fn captured_all() -> Vec<String> {
    CAPTURED.with(|c| c.borrow().iter().map(|(_, msg)| msg.clone()).collect())
}

/// Shared-ownership handle for tests that build stages directly.
#[allow(dead_code)]
pub fn shared(db: FakeGeoDb) -> Arc<dyn GeoDatabase> {
    Arc::new(db)
}
