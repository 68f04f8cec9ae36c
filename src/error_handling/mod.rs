//! Error handling and enrichment statistics.
//!
//! This module provides:
//! - Error type definitions for configuration, database open and lookups
//! - Lookup outcome categorization
//! - Enrichment statistics tracking
//!
//! Outcomes are categorized into:
//! - **Errors**: lookup failures and unsupported kinds (logged at error level)
//! - **Skips**: expected misses such as not-found addresses or absent fields (never logged)
//! - **Enriched**: a record was found and fields were written

mod stats;
mod types;

// Re-export public API
pub use stats::EnrichmentStats;
pub use types::{ConfigError, DatabaseOpenError, InitializationError, LookupError, LookupOutcome};
