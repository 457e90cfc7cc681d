//! Endpoint events.
//!
//! Every interval becomes one `Open` event at its start and one `Close`
//! event at its end, grouped by contig. Events from any number of sources
//! are concatenated per contig without sorting; each sweep sorts its own
//! copy.
//!
//! # Ordering
//!
//! Events order by `(position, kind)` with `Close` before `Open` at the same
//! position. Intervals that merely touch (`[0,4)` and `[4,10)`) therefore
//! close before the next one opens, and depth never counts the shared
//! boundary twice.

use crate::bed::BedReader;
use crate::error::Result;
use crate::interval::Interval;
use log::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which end of an interval an event marks.
///
/// Variant order is the tie-break at equal positions: `Close` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Close,
    Open,
}

/// An interval endpoint on a contig. Field order is the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Event {
    pub position: u64,
    pub kind: EventKind,
}

impl Event {
    #[inline]
    pub fn open(position: u64) -> Self {
        Self {
            position,
            kind: EventKind::Open,
        }
    }

    #[inline]
    pub fn close(position: u64) -> Self {
        Self {
            position,
            kind: EventKind::Close,
        }
    }
}

/// Unsorted events grouped by contig.
pub type ContigEvents = FxHashMap<String, Vec<Event>>;

/// Sort events into sweep order.
#[inline]
pub fn sort_events(events: &mut [Event]) {
    events.sort_unstable();
}

/// Counters gathered while turning records into events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStreamStats {
    /// Intervals that produced events
    pub intervals: usize,
    /// Zero-width intervals, which cover nothing and produce no events
    pub zero_width: usize,
    /// Records skipped for missing fields
    pub malformed: usize,
}

impl EventStreamStats {
    fn absorb(&mut self, other: &EventStreamStats) {
        self.intervals += other.intervals;
        self.zero_width += other.zero_width;
        self.malformed += other.malformed;
    }
}

impl fmt::Display for EventStreamStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Intervals: {}, Zero-width: {}, Malformed: {}",
            self.intervals, self.zero_width, self.malformed
        )
    }
}

/// Per-contig endpoint events for one or more interval sources.
#[derive(Debug, Clone, Default)]
pub struct EventStream {
    events: ContigEvents,
    stats: EventStreamStats,
}

impl EventStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one interval's endpoints.
    pub fn push(&mut self, interval: Interval) -> Result<()> {
        interval.validate()?;
        if interval.is_empty() {
            self.stats.zero_width += 1;
            return Ok(());
        }

        let events = self.events.entry(interval.contig).or_default();
        events.push(Event::open(interval.start));
        events.push(Event::close(interval.end));
        self.stats.intervals += 1;
        Ok(())
    }

    /// Build a stream from structured `(contig, start, end)` records.
    pub fn collect<I, T>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Interval>,
    {
        let mut stream = Self::new();
        for record in records {
            stream.push(record.into())?;
        }
        Ok(stream)
    }

    /// Build a stream from text records, skipping malformed lines.
    pub fn from_reader<R: Read>(mut reader: BedReader<R>) -> Result<Self> {
        let mut stream = Self::new();
        while let Some(interval) = reader.read_interval()? {
            stream.push(interval)?;
        }
        stream.stats.malformed = reader.malformed_records();
        Ok(stream)
    }

    /// Build a stream from a BED file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let stream = Self::from_reader(BedReader::with_capacity(file, 64 * 1024))?;
        debug!("{}: {}", path.display(), stream.stats);
        Ok(stream)
    }

    /// Combine several sources into one stream. Every interval of every
    /// source is kept, so overlaps between sources add to depth.
    pub fn merge(streams: Vec<EventStream>) -> EventStream {
        let mut stats = EventStreamStats::default();
        let maps = streams
            .into_iter()
            .map(|stream| {
                stats.absorb(&stream.stats);
                stream.events
            })
            .collect();

        EventStream {
            events: merge_sources(maps),
            stats,
        }
    }

    pub fn events(&self) -> &ContigEvents {
        &self.events
    }

    pub fn into_events(self) -> ContigEvents {
        self.events
    }

    pub fn stats(&self) -> &EventStreamStats {
        &self.stats
    }

    /// Events recorded for one contig.
    pub fn contig(&self, contig: &str) -> &[Event] {
        self.events.get(contig).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of events across all contigs.
    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }
}

/// Concatenate per-contig event lists from several sources. The result is
/// not sorted.
pub fn merge_sources(sources: Vec<ContigEvents>) -> ContigEvents {
    let mut sources = sources.into_iter();
    let mut merged = sources.next().unwrap_or_default();

    for source in sources {
        for (contig, events) in source {
            merged.entry(contig).or_default().extend(events);
        }
    }

    merged
}

/// Read several BED sources in parallel, returned in input order.
pub fn read_sources<P: AsRef<Path> + Sync>(paths: &[P]) -> Result<Vec<EventStream>> {
    paths.par_iter().map(EventStream::from_path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoverageError;

    #[test]
    fn test_close_sorts_before_open() {
        assert!(EventKind::Close < EventKind::Open);

        let mut events = vec![
            Event::open(4),
            Event::close(10),
            Event::close(4),
            Event::open(0),
        ];
        sort_events(&mut events);

        assert_eq!(
            events,
            vec![
                Event::open(0),
                Event::close(4),
                Event::open(4),
                Event::close(10)
            ]
        );
    }

    #[test]
    fn test_collect_groups_by_contig() {
        let stream =
            EventStream::collect([("chr1", 2u64, 10u64), ("chr2", 0, 5), ("chr1", 3, 4)]).unwrap();

        assert_eq!(
            stream.contig("chr1"),
            &[
                Event::open(2),
                Event::close(10),
                Event::open(3),
                Event::close(4)
            ]
        );
        assert_eq!(stream.contig("chr2").len(), 2);
        assert!(stream.contig("chr3").is_empty());
        assert_eq!(stream.stats().intervals, 3);
        assert_eq!(stream.event_count(), 6);
    }

    #[test]
    fn test_zero_width_produces_no_events() {
        let stream = EventStream::collect([("chr1", 5u64, 5u64), ("chr1", 1, 2)]).unwrap();
        assert_eq!(stream.contig("chr1"), &[Event::open(1), Event::close(2)]);
        assert_eq!(stream.stats().zero_width, 1);
        assert_eq!(stream.stats().intervals, 1);
    }

    #[test]
    fn test_collect_rejects_inverted() {
        let err = EventStream::collect([("chr1", 9u64, 3u64)]).unwrap_err();
        assert!(matches!(err, CoverageError::InvalidInterval { .. }));
    }

    #[test]
    fn test_from_reader_counts_malformed() {
        let content = "chr1\t0\t10\nchr1\t5\nchr1\t5\t15\n";
        let stream = EventStream::from_reader(BedReader::new(content.as_bytes())).unwrap();

        assert_eq!(stream.stats().intervals, 2);
        assert_eq!(stream.stats().malformed, 1);
        assert_eq!(stream.event_count(), 4);
    }

    #[test]
    fn test_merge_keeps_duplicates() {
        let a = EventStream::collect([("chr1", 0u64, 10u64)]).unwrap();
        let b = EventStream::collect([("chr1", 0u64, 10u64), ("chr2", 1, 3)]).unwrap();

        let merged = EventStream::merge(vec![a, b]);
        assert_eq!(merged.contig("chr1").len(), 4);
        assert_eq!(merged.contig("chr2").len(), 2);
        assert_eq!(merged.stats().intervals, 3);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_sources(Vec::new()).is_empty());
        let merged = EventStream::merge(Vec::new());
        assert_eq!(merged.event_count(), 0);
    }
}
