//! Streaming reader for tab-delimited interval records.
//!
//! Liftover tools occasionally emit partial lines, so a record missing any
//! of the three required fields is logged and skipped. Numeric corruption is
//! never skipped: a start or end that is not an unsigned integer is fatal.

use crate::error::{CoverageError, Result};
use crate::interval::Interval;
use log::warn;
use memchr::{memchr, memchr_iter};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// A streaming BED reader.
pub struct BedReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
    malformed: usize,
}

impl BedReader<File> {
    /// Open a BED file from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> BedReader<R> {
    /// Create a new BED reader from any readable source.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::with_capacity(1024),
            malformed: 0,
        }
    }

    /// Create a BED reader with custom buffer capacity.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buffer: String::with_capacity(1024),
            malformed: 0,
        }
    }

    /// Number of records skipped so far for missing fields.
    pub fn malformed_records(&self) -> usize {
        self.malformed
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next well-formed interval.
    pub fn read_interval(&mut self) -> Result<Option<Interval>> {
        loop {
            self.buffer.clear();
            let bytes_read = self.reader.read_line(&mut self.buffer)?;
            if bytes_read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(['\n', '\r']);

            // Skip empty lines and headers
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || trimmed.starts_with('#')
                || trimmed.starts_with("track")
                || trimmed.starts_with("browser")
            {
                continue;
            }

            if let Some(interval) = parse_line(line, self.line_number)? {
                return Ok(Some(interval));
            }
            self.malformed += 1;
        }
    }
}

impl<R: Read> Iterator for BedReader<R> {
    type Item = Result<Interval>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_interval().transpose()
    }
}

/// Parse one record line. Returns `Ok(None)` for a malformed (skipped) record.
fn parse_line(line: &str, line_number: usize) -> Result<Option<Interval>> {
    let bytes = line.as_bytes();
    let fields = memchr_iter(b'\t', bytes).count() + 1;

    let tab1 = match memchr(b'\t', bytes) {
        Some(tab) if fields >= 3 && tab > 0 => tab,
        _ => {
            let skipped = CoverageError::MalformedRecord {
                line: line_number,
                fields,
            };
            warn!("{}; skipping", skipped);
            return Ok(None);
        }
    };

    let contig = &line[..tab1];
    let rest = &line[tab1 + 1..];
    // fields >= 3 guarantees a second tab
    let tab2 = memchr(b'\t', rest.as_bytes()).unwrap_or(rest.len());
    let start_field = &rest[..tab2];
    let rest = rest.get(tab2 + 1..).unwrap_or("");
    let end_field = match memchr(b'\t', rest.as_bytes()) {
        Some(tab3) => &rest[..tab3],
        None => rest,
    };

    let start = parse_position(start_field, "start", line_number)?;
    let end = parse_position(end_field, "end", line_number)?;

    Interval::try_new(contig, start, end).map(Some)
}

fn parse_position(s: &str, field_name: &str, line_number: usize) -> Result<u64> {
    s.trim().parse().map_err(|_| CoverageError::Parse {
        line: line_number,
        message: format!("Invalid {} position: '{}'", field_name, s),
    })
}

/// Read all well-formed intervals from a BED file.
pub fn read_intervals<P: AsRef<Path>>(path: P) -> Result<Vec<Interval>> {
    BedReader::from_path(path)?.collect()
}

/// Parse intervals from a string (useful for testing).
pub fn parse_intervals(content: &str) -> Result<Vec<Interval>> {
    BedReader::new(content.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bed3() {
        let content = "chr1\t100\t200\nchr1\t300\t400\n";
        let intervals = parse_intervals(content).unwrap();

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].contig, "chr1");
        assert_eq!(intervals[0].start, 100);
        assert_eq!(intervals[0].end, 200);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let content = "ctg1\t5\t9\tsegment_1\t0\t+\r\n";
        let intervals = parse_intervals(content).unwrap();
        assert_eq!(intervals, vec![Interval::new("ctg1", 5, 9)]);
    }

    #[test]
    fn test_skip_comments_and_headers() {
        let content = "# comment\ntrack name=test\nbrowser position chr1:1-1000\n\nchr1\t100\t200\n";
        let mut reader = BedReader::new(content.as_bytes());
        let intervals: Vec<_> = reader.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(intervals.len(), 1);
        assert_eq!(reader.malformed_records(), 0);
    }

    #[test]
    fn test_short_record_skipped() {
        let content = "chr1\t100\nchr1\t10\t20\nchr2\n\t5\t6\nchr1\t30\t40\n";
        let mut reader = BedReader::new(content.as_bytes());
        let intervals: Vec<_> = reader.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(
            intervals,
            vec![Interval::new("chr1", 10, 20), Interval::new("chr1", 30, 40)]
        );
        assert_eq!(reader.malformed_records(), 3);
        assert_eq!(reader.line_number(), 5);
    }

    #[test]
    fn test_bad_number_is_fatal() {
        let err = parse_intervals("chr1\t10\t20\nchr1\tten\t20\n").unwrap_err();
        match err {
            CoverageError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("start"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_coordinate_is_fatal() {
        let err = parse_intervals("chr1\t-5\t20\n").unwrap_err();
        assert!(matches!(err, CoverageError::Parse { line: 1, .. }));

        let err = parse_intervals("chr1\t5\t\n").unwrap_err();
        assert!(matches!(err, CoverageError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_inverted_interval_is_fatal() {
        let err = parse_intervals("chr1\t30\t20\n").unwrap_err();
        assert!(matches!(
            err,
            CoverageError::InvalidInterval { start: 30, end: 20, .. }
        ));
    }

    #[test]
    fn test_custom_capacity_reads_long_input() {
        let content: String = (0..500)
            .map(|i| format!("chr1\t{}\t{}\n", i * 10, i * 10 + 5))
            .collect();
        let intervals: Vec<_> = BedReader::with_capacity(content.as_bytes(), 16)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(intervals.len(), 500);
        assert_eq!(intervals[499], Interval::new("chr1", 4990, 4995));
    }
}
