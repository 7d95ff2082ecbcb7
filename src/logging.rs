//! Logger initialisation.
//!
//! The library only emits records through the `log` macros; binaries pick the
//! backend. `env_logger` is used here, configured from `RUST_LOG` or from a
//! verbosity count.

use log::LevelFilter;

/// Initializes the logger with the `env_logger` crate, honouring `RUST_LOG`.
pub fn init_logger() {
    env_logger::init();
}

/// Maps a `-v` count to a level: 0 is warn, 1 is info, 2 or more is debug.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initializes `env_logger` at the level for `verbose`.
///
/// `RUST_LOG` still refines the filter per module. Calling this again after a
/// logger is installed has no effect.
pub fn init_with_verbosity(verbose: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(verbosity_level(verbose))
        .parse_default_env()
        .try_init();
}
