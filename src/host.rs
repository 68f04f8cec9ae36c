//! Newline-delimited JSON pipeline host.
//!
//! Reads one [`Metric`] per line, hands batches to a [`Processor`] and writes
//! the returned points back out, one per line, in the same order.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::config::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};
use crate::enrich::Processor;
use crate::metric::Metric;

/// Line and point counts of one host run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HostReport {
    /// Non-blank input lines
    pub lines_read: usize,
    /// Lines that were not a valid metric and were skipped
    pub malformed_lines: usize,
    pub batches: usize,
    pub points_written: usize,
}

/// Pipes `input` through `processor` into `output` in batches of `batch_size`.
///
/// `batch_size` is clamped to `1..=MAX_BATCH_SIZE`. Blank lines are ignored;
/// lines that are not UTF-8 or not a valid metric are logged at warn level and
/// dropped before they reach the processor. On a read error the points
/// already buffered are still processed and written before the error is
/// returned.
pub fn run_json_lines<R: BufRead, W: Write>(
    processor: &dyn Processor<Metric>,
    mut input: R,
    mut output: W,
    batch_size: usize,
) -> Result<HostReport> {
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let mut report = HostReport::default();
    let mut batch = Vec::with_capacity(batch_size.min(DEFAULT_BATCH_SIZE));
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let read = match input.read_until(b'\n', &mut buf) {
            Ok(read) => read,
            Err(e) => {
                if !batch.is_empty() {
                    flush_batch(processor, &mut batch, &mut output, &mut report)?;
                }
                output.flush().context("Failed to flush output")?;
                return Err(anyhow::Error::new(e).context("Failed to read input line"));
            }
        };
        if read == 0 {
            break;
        }
        line_number += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(text) => text.trim_end_matches(['\n', '\r']),
            Err(e) => {
                log::warn!("Skipping non-UTF-8 line {}: {}", line_number, e);
                report.lines_read += 1;
                report.malformed_lines += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        report.lines_read += 1;

        match serde_json::from_str::<Metric>(line) {
            Ok(metric) => batch.push(metric),
            Err(e) => {
                log::warn!("Skipping malformed metric on line {}: {}", line_number, e);
                report.malformed_lines += 1;
            }
        }

        if batch.len() >= batch_size {
            flush_batch(processor, &mut batch, &mut output, &mut report)?;
        }
    }
    if !batch.is_empty() {
        flush_batch(processor, &mut batch, &mut output, &mut report)?;
    }

    output.flush().context("Failed to flush output")?;
    Ok(report)
}

fn flush_batch<W: Write>(
    processor: &dyn Processor<Metric>,
    batch: &mut Vec<Metric>,
    output: &mut W,
    report: &mut HostReport,
) -> Result<()> {
    let points = processor.apply(std::mem::take(batch));
    report.batches += 1;
    for point in &points {
        serde_json::to_writer(&mut *output, point).context("Failed to serialize metric")?;
        output.write_all(b"\n").context("Failed to write output")?;
        report.points_written += 1;
    }
    Ok(())
}
