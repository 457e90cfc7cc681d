//! Runtime configuration.
//!
//! Everything here is set once at startup by the binary. Library code takes
//! its parameters as explicit values and never reads global settings.

use crate::error::Result;
use log::LevelFilter;

/// Default bases of flanking context added to each gap.
pub const DEFAULT_SEQUENCE_CONTEXT: u64 = 0;

/// Default minimum reported gap size.
pub const DEFAULT_MINIMUM_GAP_SIZE: u64 = 0;

/// Thread pool and logging settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Worker threads (default: number of CPUs)
    pub threads: Option<usize>,
    /// Number of `-v` flags
    pub verbosity: u8,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set thread count (builder pattern).
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Set verbosity (builder pattern).
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// 0 → warn, 1 → info, 2+ → debug.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    /// Install the stderr logger. Later calls are ignored.
    pub fn init_logging(&self) {
        let _ = env_logger::Builder::new()
            .filter_level(self.log_level())
            .format_timestamp(None)
            .try_init();
    }

    /// Configure the global rayon pool. A no-op without `threads`.
    pub fn init_thread_pool(&self) -> Result<()> {
        if let Some(n) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build_global()?;
        }
        Ok(())
    }
}
