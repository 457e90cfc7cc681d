//! Parallel processing utilities using Rayon.
//!
//! Contigs are independent: a sweep over one contig never touches another
//! contig's state, so every per-contig computation fans out across the
//! thread pool without locking.

use crate::error::Result;
use crate::events::{ContigEvents, Event};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

/// Minimum number of events before enabling parallelization.
/// Below this threshold, sequential processing is faster due to
/// thread spawn overhead.
pub const PARALLEL_THRESHOLD: usize = 10_000;

/// Run a fallible per-contig operation over every contig of `events`.
///
/// Stops at the first error; which contig's error surfaces is unspecified
/// when several fail.
pub fn try_process_contigs<F, T>(events: &ContigEvents, f: F) -> Result<FxHashMap<String, T>>
where
    F: Fn(&str, &[Event]) -> Result<T> + Sync + Send,
    T: Send,
{
    let total: usize = events.values().map(Vec::len).sum();

    if total < PARALLEL_THRESHOLD {
        events
            .iter()
            .map(|(contig, contig_events)| f(contig, contig_events).map(|t| (contig.clone(), t)))
            .collect()
    } else {
        events
            .par_iter()
            .map(|(contig, contig_events)| f(contig, contig_events).map(|t| (contig.clone(), t)))
            .collect()
    }
}

/// Statistics for parallel work distribution.
#[derive(Debug, Clone)]
pub struct ParallelStats {
    pub total_events: usize,
    pub num_contigs: usize,
    pub events_per_contig: Vec<(String, usize)>,
}

impl ParallelStats {
    pub fn from_events(events: &ContigEvents) -> Self {
        let mut events_per_contig: Vec<(String, usize)> = events
            .iter()
            .map(|(contig, contig_events)| (contig.clone(), contig_events.len()))
            .collect();
        events_per_contig.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_events: events_per_contig.iter().map(|(_, n)| n).sum(),
            num_contigs: events_per_contig.len(),
            events_per_contig,
        }
    }

    /// The contig with the most events, which bounds parallel speedup.
    pub fn largest(&self) -> Option<(&str, usize)> {
        self.events_per_contig
            .first()
            .map(|(contig, n)| (contig.as_str(), *n))
    }
}
