//! Log output for the CLI.
//!
//! The core library only emits `tracing` events; this installs the
//! subscriber that prints them to stderr.

use tracing::Level;

/// Maps the `-v` count to a maximum log level.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a stderr fmt subscriber. Does nothing if one is already set.
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for_verbosity(verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
