//! Tracing setup for studyctl
//!
//! Logs go to stderr so `--json` output on stdout stays machine-readable.
//! `STUDY_LOG` takes an env-filter directive (e.g. `study_common=debug`).

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "STUDY_LOG";

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
