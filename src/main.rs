//! CLI entry point for seamless tile extraction

use clap::Parser;
use seamtile::io::cli::{Cli, FileProcessor, init_logging};

fn main() -> seamtile::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
