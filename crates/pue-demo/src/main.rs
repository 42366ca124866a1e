#![forbid(unsafe_code)]

//! Headless rendition of the classic pue counter page.

mod app;
mod cli;

use std::io;
use std::process::ExitCode;

use pue::{Pue, PueConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let opts = cli::Opts::parse();
    init_tracing();

    let mut config = PueConfig::from_env();
    if let Some(relisten) = opts.relisten {
        config = config.with_model(config.model.with_relisten_on_change(relisten));
    }
    let pue = Pue::new(config);

    let stdout = io::stdout();
    match app::run(&pue, &opts, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(message = "demo.output_failed", error = %err);
            ExitCode::FAILURE
        }
    }
}
