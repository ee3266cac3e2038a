//! `storefront` binary entry point.
//!
//! Logs go to stderr (filtered by `RUST_LOG`, default `warn`) so stdout
//! carries only command output.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use storefront_cli::{Cli, run};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let mut stdout = io::stdout().lock();
    let result = run(cli, &mut stdout).await;
    let _ = stdout.flush();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
