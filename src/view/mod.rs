//! Interactive viewer: live configuration surface, incremental render
//! display, and hover magnification

mod app;

use crate::io::cli::Cli;
use crate::io::error::Result;
use crate::io::image::{SampleSet, load_rgba};

/// Load the source and samples, then run the viewer until closed
///
/// # Errors
///
/// Returns an error if any image fails to load or the windowing backend
/// fails to start.
pub fn launch(cli: &Cli) -> Result<()> {
    let source = load_rgba(&cli.source)?;
    let samples = SampleSet::load_dir(&cli.samples)?;
    app::run(source, samples, cli.render_config(), cli.seed)
}
