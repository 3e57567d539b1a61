//! Logging setup
//!
//! The library logs through the `log` facade; binaries and tests pick the
//! backend. These helpers install `env_logger` the way the demo tools expect.

use log::LevelFilter;

/// Install `env_logger` with `level` as the default filter.
///
/// `RUST_LOG` still takes precedence when set. Safe to call more than once;
/// later calls are ignored.
pub fn init_with_level(level: LevelFilter) {
    let installed = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok();
    if installed {
        log::trace!("Logger installed (default level {level})");
    }
}
