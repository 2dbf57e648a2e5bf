//! Logger set-up for the command-line driver.

use log::{info, LevelFilter, SetLoggerError};

/// Install a `fern` dispatcher writing to stderr at `min_level`.
///
/// Must only be called once per process.
pub fn init(min_level: LevelFilter) -> Result<(), SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            // Include the target only for debug and trace records
            if record.level() > log::Level::Info {
                out.finish(format_args!(
                    "[{} {:5}] {}: {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{} {:5}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    message
                ))
            }
        })
        .level(min_level)
        .chain(std::io::stderr())
        .apply()?;

    info!("Logging initialised at {:?}", min_level);
    Ok(())
}
