use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs an `env_logger` backend for the `log` facade.
///
/// Probe trails are emitted at `debug`, per-attempt detail at `trace`; raise
/// the level with `RUST_LOG=probe_table=debug`. Safe to call repeatedly.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("probe_table", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // Another backend may already be installed by the embedding binary.
        let _ = builder.try_init();
    });
}
