//! liftcov: liftover coverage profiling
//!
//! Usage: liftcov <COMMAND> [OPTIONS]

use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process;

use liftcov::commands::{CoverageSweep, DepthHistogramSweep, GapExtractor, ProfileCommand};
use liftcov::config::{RuntimeConfig, DEFAULT_MINIMUM_GAP_SIZE, DEFAULT_SEQUENCE_CONTEXT};
use liftcov::error::Result;
use liftcov::genome::ContigLengths;
use liftcov::report::ReportWriter;

#[derive(Parser)]
#[command(name = "liftcov")]
#[command(version)]
#[command(about = "Profile how completely an assembly maps through liftover intervals", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge intervals from every input into covered regions (BED3)
    Covered {
        /// Input BED files
        #[arg(short, long, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Contig length file for output ordering
        #[arg(short = 'g', long)]
        genome: Option<PathBuf>,
    },

    /// Per-base overlap depth histogram across every input
    Depth {
        /// Input BED files
        #[arg(short, long, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Contig length file
        #[arg(short = 'g', long)]
        genome: PathBuf,
    },

    /// Regions not covered by any input (BED3)
    Gaps {
        /// Input BED files
        #[arg(short, long, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Contig length file
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Bases of flanking context added to each gap
        #[arg(short = 'c', long, default_value_t = DEFAULT_SEQUENCE_CONTEXT)]
        context: u64,

        /// Minimum gap size (after context) to report
        #[arg(short = 'm', long, default_value_t = DEFAULT_MINIMUM_GAP_SIZE)]
        min_size: u64,
    },

    /// Summary of mapped and unmapped bases plus the depth histogram
    Profile {
        /// Input BED files
        #[arg(short, long, required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Contig length file
        #[arg(short = 'g', long)]
        genome: PathBuf,

        /// Label for the report rows
        #[arg(short = 'n', long, default_value = "assembly")]
        name: String,

        /// Bases of flanking context added to each gap
        #[arg(short = 'c', long, default_value_t = DEFAULT_SEQUENCE_CONTEXT)]
        context: u64,

        /// Minimum gap size (after context) to report
        #[arg(short = 'm', long, default_value_t = DEFAULT_MINIMUM_GAP_SIZE)]
        min_size: u64,
    },

    /// One BED3 interval spanning each contig, for use as liftover input
    FullBed {
        /// Contig length file
        #[arg(short = 'g', long)]
        genome: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = RuntimeConfig::new()
        .with_threads(cli.threads)
        .with_verbosity(cli.verbose);
    config.init_logging();

    let result = config.init_thread_pool().and_then(|()| match cli.command {
        Commands::Covered { inputs, genome } => run_covered(inputs, genome),
        Commands::Depth { inputs, genome } => run_depth(inputs, genome),
        Commands::Gaps {
            inputs,
            genome,
            context,
            min_size,
        } => run_gaps(inputs, genome, context, min_size),
        Commands::Profile {
            inputs,
            genome,
            name,
            context,
            min_size,
        } => run_profile(inputs, genome, name, context, min_size),
        Commands::FullBed { genome } => run_full_bed(genome),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_covered(inputs: Vec<PathBuf>, genome: Option<PathBuf>) -> Result<()> {
    let lengths = genome.map(ContigLengths::from_file).transpose()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    CoverageSweep::new().run(&inputs, lengths.as_ref(), &mut handle)?;
    Ok(())
}

fn run_depth(inputs: Vec<PathBuf>, genome: PathBuf) -> Result<()> {
    let lengths = ContigLengths::from_file(&genome)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    DepthHistogramSweep::new().run(&inputs, &lengths, &mut handle)?;
    Ok(())
}

fn run_gaps(inputs: Vec<PathBuf>, genome: PathBuf, context: u64, min_size: u64) -> Result<()> {
    let lengths = ContigLengths::from_file(&genome)?;
    let cmd = GapExtractor::new()
        .with_context(context)
        .with_minimum_size(min_size);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    cmd.run(&inputs, &lengths, &mut handle)?;
    Ok(())
}

fn run_profile(
    inputs: Vec<PathBuf>,
    genome: PathBuf,
    name: String,
    context: u64,
    min_size: u64,
) -> Result<()> {
    let lengths = ContigLengths::from_file(&genome)?;
    let cmd = ProfileCommand::new().with_gaps(
        GapExtractor::new()
            .with_context(context)
            .with_minimum_size(min_size),
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    cmd.run(&name, &inputs, &lengths, &mut handle)?;
    Ok(())
}

fn run_full_bed(genome: PathBuf) -> Result<()> {
    let lengths = ContigLengths::from_file(&genome)?;

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());

    writer.write_intervals(&lengths.full_intervals())?;
    writer.flush()
}
