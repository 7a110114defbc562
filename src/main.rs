//! CLI entry point replaying label sequences through the preemption grid

use clap::Parser;
use preemptive_grid::io::cli::{Cli, ReplayProcessor};
use preemptive_grid::io::logging::setup_logging;

fn main() -> preemptive_grid::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level)?;
    let mut processor = ReplayProcessor::new(cli);
    processor.process()?;
    Ok(())
}
