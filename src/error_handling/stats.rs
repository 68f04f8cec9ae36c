//! Enrichment statistics tracking.
//!
//! This module provides thread-safe counters for lookup outcomes and written
//! fields, so a pipeline host can report what the stage did.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::LookupOutcome;

/// Thread-safe enrichment statistics tracker.
///
/// Counts one [`LookupOutcome`] per (point, lookup spec) pair plus the total
/// number of fields added. All outcomes are initialized to zero on creation.
/// Counters are observational only and never change enrichment behaviour.
#[derive(Debug)]
pub struct EnrichmentStats {
    outcomes: HashMap<LookupOutcome, AtomicUsize>,
    fields_written: AtomicUsize,
}

impl Default for EnrichmentStats {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentStats {
    pub fn new() -> Self {
        let mut outcomes = HashMap::new();
        for outcome in LookupOutcome::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        EnrichmentStats {
            outcomes,
            fields_written: AtomicUsize::new(0),
        }
    }

    /// Increment an outcome counter.
    pub fn record(&self, outcome: LookupOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn add_fields_written(&self, count: usize) {
        self.fields_written.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the count for an outcome.
    pub fn get_count(&self, outcome: LookupOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn fields_written(&self) -> usize {
        self.fields_written.load(Ordering::SeqCst)
    }

    /// Total (point, spec) pairs processed.
    pub fn total(&self) -> usize {
        LookupOutcome::iter().map(|o| self.get_count(o)).sum()
    }

    /// Total pairs that ended in an error-severity outcome.
    pub fn total_errors(&self) -> usize {
        LookupOutcome::iter()
            .filter(|o| o.is_error())
            .map(|o| self.get_count(o))
            .sum()
    }

    /// Logs a one-line-per-outcome summary at info level, skipping zero counts.
    pub fn log_summary(&self) {
        log::info!(
            "GeoIP enrichment: {} lookups, {} fields written, {} errors",
            self.total(),
            self.fields_written(),
            self.total_errors()
        );
        for outcome in LookupOutcome::iter() {
            let count = self.get_count(outcome);
            if count > 0 {
                log::info!("  {}: {}", outcome, count);
            }
        }
    }
}
