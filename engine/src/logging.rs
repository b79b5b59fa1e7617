use log::LevelFilter;

/// Level used when `RUST_LOG` is unset: chatty in debug builds, silent in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

/// Installs the process logger. `RUST_LOG` overrides the default level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level());
    builder.parse_default_env();
    builder.format_timestamp_millis();
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
