//! GeoIP enrichment of metric batches.
//!
//! [`EnrichmentStage`] owns the open database and the lookup specs;
//! [`MappingEngine`] applies the specs to each point.

mod mapping;
mod processor;
mod stage;

// Re-export public API
pub use mapping::{apply_spec, MappingEngine, SpecOutcome};
pub use processor::Processor;
pub use stage::EnrichmentStage;
