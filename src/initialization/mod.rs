//! Application initialization.
//!
//! Logger setup for the bundled pipeline host. Database initialization lives
//! on [`EnrichmentStage`](crate::EnrichmentStage).

mod logger;

// Re-export public API
pub use logger::init_logger_with;
