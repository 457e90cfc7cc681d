//! liftcov: liftover coverage profiling
//!
//! Measures how completely one genome assembly maps onto another, given the
//! intervals a liftover tool produced.
//!
//! # Features
//!
//! - **Coverage**: merged covered regions per contig
//! - **Depth**: per-base overlap depth histogram across many sources
//! - **Gaps**: poor-mapping regions with context padding and size filtering
//! - **Parallel processing**: contigs are swept independently with Rayon
//!
//! # Example
//!
//! ```rust,no_run
//! use liftcov::{commands::ProfileCommand, events::read_sources, genome::ContigLengths};
//!
//! let lengths = ContigLengths::from_file("assembly.fai").unwrap();
//! let sources = read_sources(&["lifted_a.bed", "lifted_b.bed"]).unwrap();
//!
//! let profile = ProfileCommand::new().profile(sources, &lengths).unwrap();
//! println!("{} bases unmapped", profile.bases_unmapped());
//! ```

pub mod bed;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod genome;
pub mod interval;
pub mod parallel;
pub mod report;

// Re-export commonly used types
pub use bed::{read_intervals, BedReader};
pub use error::{CoverageError, Result};
pub use events::{Event, EventKind, EventStream};
pub use genome::ContigLengths;
pub use interval::{Interval, Region, RegionMap};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bed::{read_intervals, BedReader};
    pub use crate::commands::{
        CoverageSweep, DepthHistogram, DepthHistogramSweep, GapExtractor, MappingProfile,
        ProfileCommand,
    };
    pub use crate::error::{CoverageError, Result};
    pub use crate::events::{merge_sources, read_sources, Event, EventKind, EventStream};
    pub use crate::genome::ContigLengths;
    pub use crate::interval::{Interval, Region, RegionMap};
}
