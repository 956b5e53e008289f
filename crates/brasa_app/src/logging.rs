//! Logging bootstrap: routes the `log` facade used across the engine crates
//! to stdout via `fern`.

/// Installs the global logger.  Safe to call more than once — subsequent
/// calls are ignored.
pub fn init() {
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] {}: {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        // wgpu is chatty at Info level during device setup.
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply();

    if result.is_err() {
        // A logger was already installed (tests, embedding apps).
    }
}
