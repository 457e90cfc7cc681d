//! Poor-mapping gap extraction.
//!
//! Returns the spans of each contig NOT covered by any interval, widened by
//! `context` bases into the neighbouring coverage and filtered by size.

use crate::config::{DEFAULT_MINIMUM_GAP_SIZE, DEFAULT_SEQUENCE_CONTEXT};
use crate::error::{CoverageError, Result};
use crate::events::{read_sources, EventStream};
use crate::genome::ContigLengths;
use crate::interval::{GapRegion, Region, RegionMap};
use crate::report::ReportWriter;
use log::info;
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;

use super::CoverageSweep;

/// Gap extraction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapExtractor {
    /// Bases of flanking coverage added to each side of a gap
    pub context: u64,
    /// Smallest gap (after padding) that is reported
    pub minimum_size: u64,
}

impl Default for GapExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl GapExtractor {
    pub fn new() -> Self {
        Self {
            context: DEFAULT_SEQUENCE_CONTEXT,
            minimum_size: DEFAULT_MINIMUM_GAP_SIZE,
        }
    }

    /// Set context padding (builder pattern).
    pub fn with_context(mut self, context: u64) -> Self {
        self.context = context;
        self
    }

    /// Set minimum gap size (builder pattern).
    pub fn with_minimum_size(mut self, minimum_size: u64) -> Self {
        self.minimum_size = minimum_size;
        self
    }

    /// Gaps on one contig of `length` bases.
    ///
    /// `covered` must be ordered and non-overlapping, as `CoverageSweep`
    /// produces it. A contig with no coverage is a single gap regardless of
    /// size. Coverage past the contig end is `OutOfBounds`.
    pub fn extract_contig(
        &self,
        contig: &str,
        length: u64,
        covered: &[Region],
    ) -> Result<Vec<GapRegion>> {
        let (Some(first), Some(last)) = (covered.first(), covered.last()) else {
            return Ok(vec![Region::new(0, length)]);
        };

        if last.end > length {
            return Err(CoverageError::OutOfBounds {
                contig: contig.to_string(),
                position: last.end,
                length,
            });
        }

        let mut candidates = Vec::with_capacity(covered.len() + 1);

        if first.start > 0 {
            candidates.push(Region::new(
                0,
                first.start.saturating_add(self.context).min(length),
            ));
        }

        for pair in covered.windows(2) {
            candidates.push(Region::new(
                pair[0].end.saturating_sub(self.context),
                pair[1].start.saturating_add(self.context).min(length),
            ));
        }

        if last.end < length {
            candidates.push(Region::new(last.end.saturating_sub(self.context), length));
        }

        candidates.retain(|gap| gap.len() >= self.minimum_size);
        Ok(candidates)
    }

    /// Gaps for every contig in `lengths`. Covered regions on contigs
    /// without a length are ignored.
    pub fn extract(&self, lengths: &ContigLengths, covered: &RegionMap) -> Result<RegionMap> {
        let contigs: Vec<(&str, u64)> = lengths.iter().collect();
        contigs
            .par_iter()
            .map(|&(contig, length)| {
                let regions = covered.get(contig).map(Vec::as_slice).unwrap_or(&[]);
                self.extract_contig(contig, length, regions)
                    .map(|gaps| (contig.to_string(), gaps))
            })
            .collect()
    }

    /// Read sources, compute coverage, and write BED3 gap regions.
    pub fn run<P: AsRef<Path> + Sync, W: Write>(
        &self,
        inputs: &[P],
        lengths: &ContigLengths,
        output: &mut W,
    ) -> Result<RegionMap> {
        let merged = EventStream::merge(read_sources(inputs)?);
        info!("Merged {} source(s): {}", inputs.len(), merged.stats());

        let covered = CoverageSweep::new().sweep(merged.events())?;
        let gaps = self.extract(lengths, &covered)?;

        let mut writer = ReportWriter::new(output);
        writer.write_regions(&gaps, Some(lengths))?;
        writer.flush()?;
        Ok(gaps)
    }
}
