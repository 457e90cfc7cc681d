//! End-to-end scenarios through the public library API.

use liftcov::commands::{
    CoverageSweep, DepthHistogram, DepthHistogramSweep, GapExtractor, ProfileCommand,
};
use liftcov::events::{read_sources, EventStream};
use liftcov::genome::ContigLengths;
use liftcov::interval::{map_total_length, Region, RegionMap};
use liftcov::CoverageError;
use std::io::Write;
use tempfile::NamedTempFile;

fn stream(records: &[(&str, u64, u64)]) -> EventStream {
    EventStream::collect(records.iter().copied()).unwrap()
}

fn lengths(entries: &[(&str, u64)]) -> ContigLengths {
    entries.iter().copied().collect()
}

fn regions(spans: &[(u64, u64)]) -> Vec<Region> {
    spans.iter().copied().map(Region::from).collect()
}

fn histogram(buckets: &[(u32, u64)]) -> DepthHistogram {
    buckets.iter().copied().collect()
}

// =============================================================================
// Single source
// =============================================================================

#[test]
fn test_single_interval_pipeline() {
    let source = stream(&[("chr1", 2, 10)]);
    let lengths = lengths(&[("chr1", 20)]);

    let covered = CoverageSweep::new().sweep(source.events()).unwrap();
    assert_eq!(covered["chr1"], regions(&[(2, 10)]));

    let hist = DepthHistogramSweep::new()
        .sweep(source.events(), &lengths)
        .unwrap();
    assert_eq!(hist, histogram(&[(0, 12), (1, 8)]));

    let gaps = GapExtractor::new().extract(&lengths, &covered).unwrap();
    assert_eq!(gaps["chr1"], regions(&[(0, 2), (10, 20)]));
}

#[test]
fn test_touching_intervals() {
    let source = stream(&[("chr1", 0, 4), ("chr1", 4, 10)]);
    let lengths = lengths(&[("chr1", 10)]);

    let covered = CoverageSweep::new().sweep(source.events()).unwrap();
    assert_eq!(covered["chr1"], regions(&[(0, 4), (4, 10)]));
    assert_eq!(map_total_length(&covered), 10);

    let hist = DepthHistogramSweep::new()
        .sweep(source.events(), &lengths)
        .unwrap();
    assert_eq!(hist, histogram(&[(1, 10)]));
}

#[test]
fn test_minimum_size_filtering() {
    let mut covered = RegionMap::default();
    covered.insert("chr1".to_string(), regions(&[(10, 20), (25, 95)]));

    let gaps = GapExtractor::new()
        .with_context(0)
        .with_minimum_size(10)
        .extract(&lengths(&[("chr1", 100)]), &covered)
        .unwrap();

    assert_eq!(gaps["chr1"], regions(&[(0, 10)]));
}

// =============================================================================
// Multiple sources
// =============================================================================

#[test]
fn test_overlapping_sources() {
    let merged = EventStream::merge(vec![
        stream(&[("chr1", 0, 10)]),
        stream(&[("chr1", 5, 15)]),
    ]);
    let lengths = lengths(&[("chr1", 20)]);

    let hist = DepthHistogramSweep::new()
        .sweep(merged.events(), &lengths)
        .unwrap();
    assert_eq!(hist, histogram(&[(0, 5), (1, 10), (2, 5)]));

    let covered = CoverageSweep::new().sweep(merged.events()).unwrap();
    assert_eq!(covered["chr1"], regions(&[(0, 15)]));
}

#[test]
fn test_sources_from_files() {
    let mut a = NamedTempFile::new().unwrap();
    let mut b = NamedTempFile::new().unwrap();
    writeln!(a, "# lifted from asm1\nchr1\t0\t10\tseg1\nchr1\t7\t7").unwrap();
    writeln!(b, "chr1\t5\t15\nchr1\t5\nchr2\t1\t3").unwrap();

    let sources = read_sources(&[a.path(), b.path()]).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].stats().zero_width, 1);
    assert_eq!(sources[1].stats().malformed, 1);

    let profile = ProfileCommand::new()
        .profile(sources, &lengths(&[("chr1", 20), ("chr2", 4)]))
        .unwrap();

    assert_eq!(profile.stats.intervals, 3);
    assert_eq!(profile.histogram_total(), profile.total_length);
    assert_eq!(profile.histogram.get(2), 5);
    assert_eq!(profile.bases_covered(), 17);
    assert_eq!(profile.bases_unmapped(), 7);
    assert_eq!(profile.gaps["chr2"], regions(&[(0, 1), (3, 4)]));
}

#[test]
fn test_source_order_does_not_matter() {
    let a = || stream(&[("chr1", 0, 10), ("chr2", 3, 9)]);
    let b = || stream(&[("chr1", 5, 15), ("chr1", 30, 40)]);
    let c = || stream(&[("chr2", 0, 4), ("chr1", 12, 13)]);
    let lengths = lengths(&[("chr1", 50), ("chr2", 10)]);
    let command = ProfileCommand::new().with_gaps(GapExtractor::new().with_context(2));

    let forward = command.profile(vec![a(), b(), c()], &lengths).unwrap();
    let reverse = command.profile(vec![c(), b(), a()], &lengths).unwrap();

    assert_eq!(forward.covered, reverse.covered);
    assert_eq!(forward.histogram, reverse.histogram);
    assert_eq!(forward.gaps, reverse.gaps);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_inverted_record_aborts() {
    let mut a = NamedTempFile::new().unwrap();
    writeln!(a, "chr1\t0\t10\nchr1\t30\t20").unwrap();

    let err = read_sources(&[a.path()]).unwrap_err();
    assert!(matches!(
        err,
        CoverageError::InvalidInterval { start: 30, end: 20, .. }
    ));
}

#[test]
fn test_unknown_contig_excluded_from_histogram() {
    let source = stream(&[("chr1", 0, 5), ("chrUn_1", 0, 100)]);
    let lengths = lengths(&[("chr1", 10)]);

    let hist = DepthHistogramSweep::new()
        .sweep(source.events(), &lengths)
        .unwrap();
    assert_eq!(hist.total_bases(), 10);
}
