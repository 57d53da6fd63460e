//! orrery CLI - planetary orbit visualizations
//!
//! Command-line interface and web server entry point.

use std::process::ExitCode;

use orrery::cli::{run_cli, Args};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run_cli(Args::parse())
}
