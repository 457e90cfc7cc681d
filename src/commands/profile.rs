//! End-to-end mapping profile.
//!
//! Takes the liftover output for one assembly (any number of interval
//! sources) and reports how much of the assembly mapped, the depth
//! distribution, and the poor-mapping gaps.

use crate::error::Result;
use crate::events::{read_sources, EventStream, EventStreamStats};
use crate::genome::ContigLengths;
use crate::interval::{map_total_length, RegionMap};
use crate::parallel::ParallelStats;
use crate::report::{ratio, ReportWriter};
use log::{debug, info};
use std::io::Write;
use std::path::Path;

use super::{CoverageSweep, DepthHistogram, DepthHistogramSweep, GapExtractor};

/// Everything computed for one assembly.
#[derive(Debug, Clone)]
pub struct MappingProfile {
    pub covered: RegionMap,
    pub histogram: DepthHistogram,
    pub gaps: RegionMap,
    /// Summed contig lengths
    pub total_length: u64,
    pub stats: EventStreamStats,
}

impl MappingProfile {
    /// Bases under at least one interval, on contigs with a known length.
    pub fn bases_covered(&self) -> u64 {
        map_total_length(&self.covered)
    }

    /// Bases inside reported gaps. Depends on the gap parameters: context
    /// padding and size filtering both move this away from
    /// `total_length - bases_covered`.
    pub fn bases_unmapped(&self) -> u64 {
        map_total_length(&self.gaps)
    }

    pub fn unmapped_fraction(&self) -> f64 {
        ratio(self.bases_unmapped(), self.total_length)
    }

    /// Bases accounted for by the depth histogram. Equals `total_length`.
    pub fn histogram_total(&self) -> u64 {
        self.histogram.total_bases()
    }
}

/// Profile command configuration.
#[derive(Debug, Clone, Default)]
pub struct ProfileCommand {
    pub gaps: GapExtractor,
}

impl ProfileCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gap extractor (builder pattern).
    pub fn with_gaps(mut self, gaps: GapExtractor) -> Self {
        self.gaps = gaps;
        self
    }

    /// Merge `sources` and compute the full profile against `lengths`.
    pub fn profile(
        &self,
        sources: Vec<EventStream>,
        lengths: &ContigLengths,
    ) -> Result<MappingProfile> {
        let merged = EventStream::merge(sources);
        let events = merged.events();

        let work = ParallelStats::from_events(events);
        if let Some((contig, count)) = work.largest() {
            debug!(
                "Sweeping {} events over {} contigs (largest: {} with {})",
                work.total_events, work.num_contigs, contig, count
            );
        }

        let (covered, histogram) = rayon::join(
            || CoverageSweep::new().sweep(events),
            || DepthHistogramSweep::new().sweep(events, lengths),
        );
        let mut covered = covered?;
        let histogram = histogram?;
        // contigs without a length are outside the profiled assembly
        covered.retain(|contig, _| lengths.contains(contig));
        let gaps = self.gaps.extract(lengths, &covered)?;

        debug!(
            "Covered regions: {}, gap regions: {}",
            covered.values().map(Vec::len).sum::<usize>(),
            gaps.values().map(Vec::len).sum::<usize>()
        );

        Ok(MappingProfile {
            covered,
            histogram,
            gaps,
            total_length: lengths.total_length(),
            stats: *merged.stats(),
        })
    }

    /// Read sources, profile them, and write the summary row followed by
    /// histogram rows labelled `name`.
    pub fn run<P: AsRef<Path> + Sync, W: Write>(
        &self,
        name: &str,
        inputs: &[P],
        lengths: &ContigLengths,
        output: &mut W,
    ) -> Result<MappingProfile> {
        let profile = self.profile(read_sources(inputs)?, lengths)?;
        info!("{}: {}", name, profile.stats);
        info!(
            "{}: {} of {} bases unmapped",
            name,
            profile.bases_unmapped(),
            profile.total_length
        );

        let mut writer = ReportWriter::new(output);
        writer.write_summary_header()?;
        writer.write_summary(name, &profile)?;
        writer.write_histogram(name, &profile.histogram, profile.total_length)?;
        writer.flush()?;
        Ok(profile)
    }
}
