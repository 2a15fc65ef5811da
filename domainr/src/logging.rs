//! Tracing subscriber setup for the CLI.
//!
//! The library only emits events; this is the one place a subscriber is
//! installed. Output goes to stderr so stdout stays clean for results.
//!
//! | Flag(s) | Level |
//! |---------|-------|
//! | (none)  | WARN  |
//! | `-v`    | INFO  |
//! | `-vv`   | DEBUG |
//! | `-vvv`  | TRACE |
//!
//! `RUST_LOG` overrides the flags when set.

use std::io::IsTerminal as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
pub fn init_logging(verbose: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = level_for(verbose);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("domainr={level},domainr_lib={level}")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| format!("Failed to initialise logging: {}", e))?;

    Ok(())
}

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
