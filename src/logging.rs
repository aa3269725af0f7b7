//! Logger set-up for the headless runner and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global `env_logger` backend.
///
/// `verbose` lowers the default filter from info to debug, which surfaces
/// every behaviour transition. `RUST_LOG` still overrides either default.
/// Returns `false` when a logger was already installed, so tests may call
/// this repeatedly.
pub fn init(verbose: bool) -> bool {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_ok()
}
