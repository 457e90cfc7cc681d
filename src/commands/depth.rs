//! Depth histogram sweep.
//!
//! Counts how many bases sit at each overlap depth. Every base of every
//! swept contig lands in exactly one bucket, so the histogram total equals
//! the summed contig lengths.

use crate::error::{CoverageError, Result};
use crate::events::{read_sources, sort_events, ContigEvents, Event, EventKind, EventStream};
use crate::genome::ContigLengths;
use crate::report::ReportWriter;
use log::{info, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Bases per exact overlap depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthHistogram {
    bases: BTreeMap<u32, u64>,
}

impl DepthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `bases` to `depth`. Zero-base spans leave no bucket behind.
    #[inline]
    pub fn add(&mut self, depth: u32, bases: u64) {
        if bases > 0 {
            *self.bases.entry(depth).or_insert(0) += bases;
        }
    }

    /// Fold another histogram into this one. Order of merging never
    /// changes the result.
    pub fn merge(&mut self, other: &DepthHistogram) {
        for (&depth, &bases) in &other.bases {
            self.add(depth, bases);
        }
    }

    /// Owned variant of [`merge`](Self::merge) for reductions.
    pub fn merged(mut self, other: DepthHistogram) -> DepthHistogram {
        if self.bases.len() < other.bases.len() {
            let mut other = other;
            other.merge(&self);
            return other;
        }
        self.merge(&other);
        self
    }

    /// Bases at exactly `depth`.
    pub fn get(&self, depth: u32) -> u64 {
        self.bases.get(&depth).copied().unwrap_or(0)
    }

    pub fn total_bases(&self) -> u64 {
        self.bases.values().sum()
    }

    /// Deepest bucket with any bases.
    pub fn max_depth(&self) -> Option<u32> {
        self.bases.keys().next_back().copied()
    }

    /// Share of all bases that sit at `depth`.
    pub fn fraction(&self, depth: u32) -> f64 {
        let total = self.total_bases();
        if total == 0 {
            0.0
        } else {
            self.get(depth) as f64 / total as f64
        }
    }

    /// `(depth, bases)` in increasing depth.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.bases.iter().map(|(&depth, &bases)| (depth, bases))
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

impl FromIterator<(u32, u64)> for DepthHistogram {
    fn from_iter<I: IntoIterator<Item = (u32, u64)>>(iter: I) -> Self {
        let mut histogram = DepthHistogram::new();
        for (depth, bases) in iter {
            histogram.add(depth, bases);
        }
        histogram
    }
}

/// Depth histogram sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthHistogramSweep;

impl DepthHistogramSweep {
    pub fn new() -> Self {
        Self
    }

    /// Sweep one contig of `length` bases.
    ///
    /// Each span between consecutive event positions is attributed to the
    /// depth in force before the event at its right edge. The tail after the
    /// last event is uncovered.
    pub fn sweep_contig(
        &self,
        contig: &str,
        events: &[Event],
        length: u64,
    ) -> Result<DepthHistogram> {
        let mut events = events.to_vec();
        sort_events(&mut events);

        let mut histogram = DepthHistogram::new();
        let mut depth: u32 = 0;
        let mut last_position: u64 = 0;

        for event in events {
            if event.position > length {
                return Err(CoverageError::OutOfBounds {
                    contig: contig.to_string(),
                    position: event.position,
                    length,
                });
            }

            if event.position != last_position {
                histogram.add(depth, event.position - last_position);
                last_position = event.position;
            }

            match event.kind {
                EventKind::Open => depth += 1,
                EventKind::Close => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        CoverageError::unbalanced(
                            contig,
                            format!("depth below zero at {}", event.position),
                        )
                    })?;
                }
            }
        }

        if depth != 0 {
            return Err(CoverageError::unbalanced(
                contig,
                format!("depth {} after the last event", depth),
            ));
        }

        histogram.add(0, length - last_position);
        Ok(histogram)
    }

    /// Sweep every contig in `lengths` and combine the results. Contigs with
    /// events but no known length are skipped with a warning.
    pub fn sweep(&self, events: &ContigEvents, lengths: &ContigLengths) -> Result<DepthHistogram> {
        let mut unknown: Vec<&str> = events
            .keys()
            .filter(|contig| !lengths.contains(contig))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            warn!(
                "{} contig(s) have intervals but no length; skipped: {}",
                unknown.len(),
                unknown.join(", ")
            );
        }

        let contigs: Vec<(&str, u64)> = lengths.iter().collect();
        contigs
            .par_iter()
            .map(|&(contig, length)| {
                let contig_events = events.get(contig).map(Vec::as_slice).unwrap_or(&[]);
                self.sweep_contig(contig, contig_events, length)
            })
            .try_reduce(DepthHistogram::new, |a, b| Ok(a.merged(b)))
    }

    /// Read sources, sweep, and write the genome-wide histogram.
    pub fn run<P: AsRef<Path> + Sync, W: Write>(
        &self,
        inputs: &[P],
        lengths: &ContigLengths,
        output: &mut W,
    ) -> Result<DepthHistogram> {
        let merged = EventStream::merge(read_sources(inputs)?);
        info!("Merged {} source(s): {}", inputs.len(), merged.stats());

        let histogram = self.sweep(merged.events(), lengths)?;

        let mut writer = ReportWriter::new(output);
        writer.write_histogram("genome", &histogram, lengths.total_length())?;
        writer.flush()?;
        Ok(histogram)
    }
}
