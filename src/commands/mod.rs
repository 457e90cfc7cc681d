//! Coverage commands.

pub mod covered;
pub mod depth;
pub mod gaps;
pub mod profile;

pub use covered::CoverageSweep;
pub use depth::{DepthHistogram, DepthHistogramSweep};
pub use gaps::GapExtractor;
pub use profile::{MappingProfile, ProfileCommand};
