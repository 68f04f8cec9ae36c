//! Per-point, per-lookup mapping: field read, address parse, database lookup,
//! destination writes.

use crate::config::LookupSpec;
use crate::error_handling::{ConfigError, EnrichmentStats, LookupError, LookupOutcome};
use crate::geoip::{lookup_record, parse_address, DatabaseKind, GeoDatabase, GeoRecord};
use crate::metric::{FieldValue, MetricPoint};

/// Result of applying one lookup spec to one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecOutcome {
    pub outcome: LookupOutcome,
    pub fields_written: usize,
}

impl SpecOutcome {
    fn skipped(outcome: LookupOutcome) -> Self {
        Self {
            outcome,
            fields_written: 0,
        }
    }
}

/// The ordered lookup specs of a stage.
#[derive(Debug, Clone, Default)]
pub struct MappingEngine {
    specs: Vec<LookupSpec>,
}

impl MappingEngine {
    pub fn new(specs: Vec<LookupSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[LookupSpec] {
        &self.specs
    }

    /// Applies every spec to `point`, in declaration order.
    pub fn enrich_point<P: MetricPoint + ?Sized>(
        &self,
        point: &mut P,
        db: &dyn GeoDatabase,
        kind: DatabaseKind,
        stats: &EnrichmentStats,
    ) {
        for spec in &self.specs {
            let result = apply_spec(point, spec, db, kind);
            stats.record(result.outcome);
            stats.add_fields_written(result.fields_written);
        }
    }
}

/// Applies one lookup spec to one point.
///
/// Never fails: an inert spec, an absent or non-string source field, an
/// unparsable address and a not-found address are silent skips. Any other
/// lookup error is logged at error level and skipped. Only destinations the
/// spec configures for `kind` are ever written.
pub fn apply_spec<P: MetricPoint + ?Sized>(
    point: &mut P,
    spec: &LookupSpec,
    db: &dyn GeoDatabase,
    kind: DatabaseKind,
) -> SpecOutcome {
    if spec.is_inert() {
        return SpecOutcome::skipped(LookupOutcome::InertSpec);
    }
    let Some(value) = point.get_field(&spec.field) else {
        return SpecOutcome::skipped(LookupOutcome::MissingField);
    };
    let Some(text) = value.as_str() else {
        return SpecOutcome::skipped(LookupOutcome::NonStringValue);
    };
    let Some(ip) = parse_address(text) else {
        return SpecOutcome::skipped(LookupOutcome::InvalidAddress);
    };

    match lookup_record(db, kind, ip) {
        Ok(record) => SpecOutcome {
            outcome: LookupOutcome::Enriched,
            fields_written: write_record(point, spec, &record),
        },
        Err(LookupError::NotFound) => SpecOutcome::skipped(LookupOutcome::NotFound),
        Err(LookupError::UnsupportedKind(kind)) => {
            log::error!("{}", ConfigError::UnsupportedKind(kind.to_string()));
            SpecOutcome::skipped(LookupOutcome::UnsupportedKind)
        }
        Err(err) => {
            log::error!("GeoIP lookup error: {}", err);
            SpecOutcome::skipped(LookupOutcome::LookupFailed)
        }
    }
}

fn write_record<P: MetricPoint + ?Sized>(point: &mut P, spec: &LookupSpec, record: &GeoRecord) -> usize {
    match record {
        GeoRecord::City(city) => {
            emit(point, &spec.dest_country, || city.country_iso_code.as_str().into())
                + emit(point, &spec.dest_city, || city.city_name.as_str().into())
                + emit(point, &spec.dest_lat, || city.latitude.into())
                + emit(point, &spec.dest_lon, || city.longitude.into())
        }
        GeoRecord::Country(country) => {
            emit(point, &spec.dest_country, || country.country_iso_code.as_str().into())
        }
        GeoRecord::Asn(asn) => {
            emit(point, &spec.dest_asn, || asn.number.into())
                + emit(point, &spec.dest_asn_org, || asn.organization.as_str().into())
        }
    }
}

/// Writes `value()` to `name` unless the destination is unset. Returns 1 if written.
fn emit<P: MetricPoint + ?Sized>(point: &mut P, name: &str, value: impl FnOnce() -> FieldValue) -> usize {
    if name.is_empty() {
        return 0;
    }
    point.add_field(name, value());
    1
}
