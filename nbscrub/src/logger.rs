//! Logger initialisation for the nbscrub CLI.
//!
//! Log lines go to stderr as `[LEVEL target] message`, leaving stdout for
//! status messages and JSON reports.

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialises the global logger once. `RUST_LOG` applies unless `level`
/// forces a filter. Later calls are ignored, so tests may call it freely.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format(|buf, record| {
        writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
    });
    let _ = builder.try_init();
}
