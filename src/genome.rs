//! Contig length tables.
//!
//! Parses length files (`contig<whitespace>length` per line). Samtools `.fai`
//! indexes qualify since only the first two columns are read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{CoverageError, Result};
use crate::interval::Interval;

/// Authoritative contig extents for one assembly.
/// Preserves contig order from input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigLengths {
    /// Map of contig name to length
    lengths: FxHashMap<String, u64>,
    /// Contig order (first appearance wins)
    order: Vec<String>,
}

impl ContigLengths {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load lengths from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load lengths from any buffered source.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = Self::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(contig), Some(length)) = (fields.next(), fields.next()) else {
                return Err(CoverageError::Parse {
                    line: line_num + 1,
                    message: "Length file requires two columns: contig and length".to_string(),
                });
            };

            let length: u64 = length.parse().map_err(|_| CoverageError::Parse {
                line: line_num + 1,
                message: format!("Invalid contig length: {}", length),
            })?;

            table.insert(contig.to_string(), length);
        }

        Ok(table)
    }

    /// Get the length of a contig.
    #[inline]
    pub fn length(&self, contig: &str) -> Option<u64> {
        self.lengths.get(contig).copied()
    }

    /// Check if a contig exists.
    #[inline]
    pub fn contains(&self, contig: &str) -> bool {
        self.lengths.contains_key(contig)
    }

    /// Contig names in input order.
    pub fn contigs(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// `(contig, length)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(move |contig| (contig.as_str(), self.lengths[contig]))
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Sum of all contig lengths.
    pub fn total_length(&self) -> u64 {
        self.lengths.values().sum()
    }

    /// Insert a contig length (appends to order if new, overwrites the
    /// length otherwise).
    pub fn insert(&mut self, contig: String, length: u64) {
        if !self.lengths.contains_key(&contig) {
            self.order.push(contig.clone());
        }
        self.lengths.insert(contig, length);
    }

    /// One interval spanning each contig end to end, in input order. This is
    /// the source BED handed to a liftover tool to ask where every base of
    /// an assembly lands.
    pub fn full_intervals(&self) -> Vec<Interval> {
        self.iter()
            .map(|(contig, length)| Interval::new(contig, 0, length))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ContigLengths {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut table = ContigLengths::new();
        for (contig, length) in iter {
            table.insert(contig.into(), length);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_lengths_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000000").unwrap();
        writeln!(file, "chr2 500000").unwrap();
        writeln!(file, "# comment line").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "chr3\t250000\t52\t60\t61").unwrap();

        let lengths = ContigLengths::from_file(file.path()).unwrap();

        assert_eq!(lengths.length("chr1"), Some(1000000));
        assert_eq!(lengths.length("chr2"), Some(500000));
        assert_eq!(lengths.length("chr3"), Some(250000));
        assert_eq!(lengths.length("chr4"), None);
        assert_eq!(lengths.len(), 3);
        assert_eq!(lengths.total_length(), 1_750_000);

        let order: Vec<&String> = lengths.contigs().collect();
        assert_eq!(order, ["chr1", "chr2", "chr3"]);
    }

    #[test]
    fn test_bad_length_is_fatal() {
        let err = ContigLengths::from_reader("chr1\tten\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CoverageError::Parse { line: 1, .. }));

        let err = ContigLengths::from_reader("chr1\t10\nchr2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, CoverageError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_reinsert_keeps_order() {
        let mut lengths = ContigLengths::new();
        lengths.insert("b".to_string(), 5);
        lengths.insert("a".to_string(), 7);
        lengths.insert("b".to_string(), 9);

        let pairs: Vec<(&str, u64)> = lengths.iter().collect();
        assert_eq!(pairs, [("b", 9), ("a", 7)]);
        assert!(lengths.contains("a"));
        assert!(!lengths.contains("c"));
    }

    #[test]
    fn test_full_intervals() {
        let lengths: ContigLengths = [("ctg1", 20u64), ("ctg2", 0)].into_iter().collect();
        assert_eq!(
            lengths.full_intervals(),
            vec![Interval::new("ctg1", 0, 20), Interval::new("ctg2", 0, 0)]
        );
    }
}
