//! The enrichment stage: database initialization and batch application.

use std::sync::Arc;

use super::mapping::MappingEngine;
use super::processor::Processor;
use crate::config::{GeoIpConfig, LookupSpec};
use crate::error_handling::{ConfigError, EnrichmentStats};
use crate::geoip::{DatabaseKind, DatabaseOpener, GeoDatabase, GeoIpMetadata, MaxMindOpener};
use crate::metric::MetricPoint;

/// A ready GeoIP enrichment stage.
///
/// A stage only exists once its database is open: [`initialize`](Self::initialize)
/// either returns a ready stage or an error, so there is no way to enrich
/// through an uninitialized one. The database kind and lookup specs are fixed
/// for the lifetime of the stage.
///
/// The stage holds no locks. The database handle is shared read-only, so a
/// host may call [`enrich`](Self::enrich) from several threads at once.
#[derive(Clone)]
pub struct EnrichmentStage {
    kind: DatabaseKind,
    database: Arc<dyn GeoDatabase>,
    engine: MappingEngine,
    stats: Arc<EnrichmentStats>,
}

impl std::fmt::Debug for EnrichmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentStage")
            .field("kind", &self.kind)
            .field("metadata", &self.database.metadata())
            .field("lookups", &self.engine.specs().len())
            .finish()
    }
}

impl EnrichmentStage {
    /// Resolves `db_type` and opens `db_path` as a MaxMind database.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDbType`] for an unknown `db_type`; no file is touched.
    /// - [`ConfigError::DatabaseOpen`] when the file cannot be read, is not a
    ///   MaxMind database, or is the wrong edition for the kind.
    pub fn initialize(config: &GeoIpConfig) -> Result<Self, ConfigError> {
        Self::initialize_with(config, &MaxMindOpener)
    }

    /// Like [`initialize`](Self::initialize) with a caller-supplied opener.
    pub fn initialize_with(
        config: &GeoIpConfig,
        opener: &dyn DatabaseOpener,
    ) -> Result<Self, ConfigError> {
        let kind = DatabaseKind::from_db_type(&config.db_type)?;
        let database = opener
            .open(kind, &config.db_path)
            .map_err(|source| ConfigError::DatabaseOpen {
                path: config.db_path.clone(),
                source,
            })?;

        let stage = Self::from_database(kind, Arc::from(database), config.lookup.clone());
        log::info!(
            "GeoIP stage ready: {} database, {} lookup(s)",
            stage.kind,
            stage.engine.specs().len()
        );
        Ok(stage)
    }

    /// Builds a stage around an already-open database.
    pub fn from_database(
        kind: DatabaseKind,
        database: Arc<dyn GeoDatabase>,
        lookups: Vec<LookupSpec>,
    ) -> Self {
        Self {
            kind,
            database,
            engine: MappingEngine::new(lookups),
            stats: Arc::new(EnrichmentStats::new()),
        }
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }

    pub fn lookups(&self) -> &[LookupSpec] {
        self.engine.specs()
    }

    pub fn metadata(&self) -> Option<&GeoIpMetadata> {
        self.database.metadata()
    }

    /// Counters shared by every clone of this stage.
    pub fn stats(&self) -> &EnrichmentStats {
        &self.stats
    }

    /// Applies every lookup spec to every point, in place.
    ///
    /// Points are never added, removed or reordered. Per-point failures are
    /// skipped (and logged when they are real errors); this never fails.
    pub fn enrich<P: MetricPoint>(&self, points: &mut [P]) {
        for point in points.iter_mut() {
            self.engine
                .enrich_point(point, self.database.as_ref(), self.kind, &self.stats);
        }
    }
}

impl<P: MetricPoint> Processor<P> for EnrichmentStage {
    fn apply(&self, mut points: Vec<P>) -> Vec<P> {
        self.enrich(&mut points);
        points
    }
}
