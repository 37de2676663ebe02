//! Binary entrypoint for the `xprojedit` CLI.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // A missing .env is fine; settings then come from the real environment.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_env("XPROJEDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Recording is handled in commands::dispatch via XPROJEDIT_RECORD=<dir>.
    match xprojedit::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
