//! Tab-separated report output.
//!
//! Uses itoa for integer formatting and ryu for float formatting
//! to avoid allocation in the hot path.

use crate::commands::{DepthHistogram, MappingProfile};
use crate::error::Result;
use crate::genome::ContigLengths;
use crate::interval::{Interval, Region, RegionMap};
use std::io::{BufWriter, Write};

/// Buffer size for ReportWriter (256KB default).
const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Column header for [`ReportWriter::write_summary`] rows.
pub const SUMMARY_HEADER: &str = "#name\tlength\tcovered\tunmapped\tunmapped_fraction";

/// Buffered writer for BED3 regions, histogram rows and summaries.
pub struct ReportWriter<W: Write> {
    writer: BufWriter<W>,
    itoa_buf: itoa::Buffer,
    ryu_buf: ryu::Buffer,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(output: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, output)
    }

    pub fn with_capacity(capacity: usize, output: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, output),
            itoa_buf: itoa::Buffer::new(),
            ryu_buf: ryu::Buffer::new(),
        }
    }

    /// Write one BED3 line.
    #[inline]
    pub fn write_region(&mut self, contig: &str, region: Region) -> Result<()> {
        self.writer.write_all(contig.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.write_int(region.start)?;
        self.writer.write_all(b"\t")?;
        self.write_int(region.end)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write every region of `regions` as BED3.
    ///
    /// Contigs come in `lengths` order when given; the rest follow sorted by
    /// name.
    pub fn write_regions(
        &mut self,
        regions: &RegionMap,
        lengths: Option<&ContigLengths>,
    ) -> Result<()> {
        for contig in output_order(regions, lengths) {
            if let Some(contig_regions) = regions.get(contig) {
                for &region in contig_regions {
                    self.write_region(contig, region)?;
                }
            }
        }
        Ok(())
    }

    /// Write intervals as BED3 in the order given.
    pub fn write_intervals(&mut self, intervals: &[Interval]) -> Result<()> {
        for interval in intervals {
            self.write_region(&interval.contig, interval.region())?;
        }
        Ok(())
    }

    /// Write `label\tdepth\tbases\ttotal\tfraction` for every depth bucket.
    pub fn write_histogram(
        &mut self,
        label: &str,
        histogram: &DepthHistogram,
        total: u64,
    ) -> Result<()> {
        for (depth, bases) in histogram.iter() {
            self.writer.write_all(label.as_bytes())?;
            self.writer.write_all(b"\t")?;
            self.write_int(depth)?;
            self.writer.write_all(b"\t")?;
            self.write_int(bases)?;
            self.writer.write_all(b"\t")?;
            self.write_int(total)?;
            self.writer.write_all(b"\t")?;
            self.write_float(ratio(bases, total))?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    pub fn write_summary_header(&mut self) -> Result<()> {
        self.writer.write_all(SUMMARY_HEADER.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Write `name\tlength\tcovered\tunmapped\tunmapped_fraction`.
    pub fn write_summary(&mut self, name: &str, profile: &MappingProfile) -> Result<()> {
        self.writer.write_all(name.as_bytes())?;
        self.writer.write_all(b"\t")?;
        self.write_int(profile.total_length)?;
        self.writer.write_all(b"\t")?;
        self.write_int(profile.bases_covered())?;
        self.writer.write_all(b"\t")?;
        self.write_int(profile.bases_unmapped())?;
        self.writer.write_all(b"\t")?;
        self.write_float(profile.unmapped_fraction())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    #[inline]
    fn write_int<I: itoa::Integer>(&mut self, n: I) -> Result<()> {
        self.writer.write_all(self.itoa_buf.format(n).as_bytes())?;
        Ok(())
    }

    #[inline]
    fn write_float(&mut self, f: f64) -> Result<()> {
        self.writer.write_all(self.ryu_buf.format(f).as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// `part / total`, or 0 for an empty total.
pub(crate) fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

fn output_order<'a>(regions: &'a RegionMap, lengths: Option<&'a ContigLengths>) -> Vec<&'a str> {
    let mut order: Vec<&str> = Vec::with_capacity(regions.len());
    let mut rest: Vec<&str> = Vec::new();

    match lengths {
        Some(lengths) => {
            order.extend(
                lengths
                    .contigs()
                    .map(String::as_str)
                    .filter(|contig| regions.contains_key(*contig)),
            );
            rest.extend(
                regions
                    .keys()
                    .map(String::as_str)
                    .filter(|contig| !lengths.contains(contig)),
            );
        }
        None => rest.extend(regions.keys().map(String::as_str)),
    }

    rest.sort_unstable();
    order.extend(rest);
    order
}
