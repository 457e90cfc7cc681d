//! Covered-region sweep.
//!
//! Emits the maximal runs where at least one interval is open.
//! O(n log n) for sorting events, O(n) for sweep.

use crate::error::{CoverageError, Result};
use crate::events::{read_sources, sort_events, ContigEvents, Event, EventKind, EventStream};
use crate::genome::ContigLengths;
use crate::interval::{CoveredRegion, Region, RegionMap};
use crate::parallel::try_process_contigs;
use crate::report::ReportWriter;
use log::info;
use std::io::Write;
use std::path::Path;

/// Covered-region sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageSweep;

impl CoverageSweep {
    pub fn new() -> Self {
        Self
    }

    /// Sweep one contig's events into ordered covered regions.
    ///
    /// Regions that touch (one closes where the next opens) are reported
    /// separately, not coalesced.
    pub fn sweep_contig(&self, contig: &str, events: &[Event]) -> Result<Vec<CoveredRegion>> {
        let mut events = events.to_vec();
        sort_events(&mut events);

        let mut regions = Vec::new();
        let mut open_count: u64 = 0;
        let mut current = Region::new(0, 0);

        for event in events {
            if open_count > 0 {
                current.end = event.position;
            }

            match event.kind {
                EventKind::Open => {
                    if open_count == 0 {
                        current.start = event.position;
                    }
                    open_count += 1;
                }
                EventKind::Close => {
                    if open_count == 0 {
                        return Err(CoverageError::unbalanced(
                            contig,
                            format!("close at {} with no open interval", event.position),
                        ));
                    }
                    open_count -= 1;
                    if open_count == 0 {
                        regions.push(current);
                    }
                }
            }
        }

        if open_count != 0 {
            return Err(CoverageError::unbalanced(
                contig,
                format!("{} interval(s) still open after the last event", open_count),
            ));
        }

        Ok(regions)
    }

    /// Sweep every contig in parallel.
    pub fn sweep(&self, events: &ContigEvents) -> Result<RegionMap> {
        try_process_contigs(events, |contig, contig_events| {
            self.sweep_contig(contig, contig_events)
        })
    }

    /// Read sources, sweep, and write BED3 covered regions. Output follows
    /// `lengths` order when given, contig name order otherwise.
    pub fn run<P: AsRef<Path> + Sync, W: Write>(
        &self,
        inputs: &[P],
        lengths: Option<&ContigLengths>,
        output: &mut W,
    ) -> Result<RegionMap> {
        let merged = EventStream::merge(read_sources(inputs)?);
        info!("Merged {} source(s): {}", inputs.len(), merged.stats());

        let covered = self.sweep(merged.events())?;

        let mut writer = ReportWriter::new(output);
        writer.write_regions(&covered, lengths)?;
        writer.flush()?;
        Ok(covered)
    }
}
