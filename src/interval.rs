//! Core interval types for liftover coordinates.

use crate::error::{CoverageError, Result};
use rustc_hash::FxHashMap;
use std::fmt;

/// An interval on a named contig.
/// Uses 0-based, half-open coordinates (BED format).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    pub contig: String,
    pub start: u64,
    pub end: u64,
}

impl Interval {
    /// Create a new interval without checking `start <= end`.
    #[inline]
    pub fn new(contig: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            contig: contig.into(),
            start,
            end,
        }
    }

    /// Create a new interval, rejecting `start > end`.
    pub fn try_new(contig: impl Into<String>, start: u64, end: u64) -> Result<Self> {
        let interval = Self::new(contig, start, end);
        interval.validate()?;
        Ok(interval)
    }

    /// Check the half-open invariant.
    #[inline]
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(CoverageError::InvalidInterval {
                contig: self.contig.clone(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Returns the length of the interval.
    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the interval has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// The span of this interval without its contig.
    #[inline]
    pub fn region(&self) -> Region {
        Region::new(self.start, self.end)
    }
}

impl<S: Into<String>> From<(S, u64, u64)> for Interval {
    fn from((contig, start, end): (S, u64, u64)) -> Self {
        Interval::new(contig, start, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.contig, self.start, self.end)
    }
}

/// A half-open span on a single contig. The contig is the key of the map
/// that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    pub start: u64,
    pub end: u64,
}

impl Region {
    #[inline]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Attach a contig name.
    pub fn to_interval(&self, contig: &str) -> Interval {
        Interval::new(contig, self.start, self.end)
    }
}

impl From<(u64, u64)> for Region {
    fn from((start, end): (u64, u64)) -> Self {
        Region::new(start, end)
    }
}

/// Maximal run of bases with at least one open interval.
pub type CoveredRegion = Region;

/// Complement span that survived padding and size filtering.
pub type GapRegion = Region;

/// Regions grouped by contig.
pub type RegionMap = FxHashMap<String, Vec<Region>>;

/// Sum of region lengths.
pub fn total_length(regions: &[Region]) -> u64 {
    regions.iter().map(Region::len).sum()
}

/// Sum of region lengths across every contig of a map.
pub fn map_total_length(regions: &RegionMap) -> u64 {
    regions.values().map(|r| total_length(r)).sum()
}
