//! CLI entry point for the mosaic renderer

use clap::Parser;
use mosaicker::io::cli::{Cli, MosaicJob};

fn main() -> mosaicker::Result<()> {
    let cli = Cli::parse();
    if cli.interactive {
        mosaicker::view::launch(&cli)
    } else {
        let job = MosaicJob::new(cli);
        job.process()
    }
}
