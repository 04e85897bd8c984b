//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a default level.
///
/// `RUST_LOG` still takes precedence when it is set. Calling this more than
/// once is harmless; later calls keep the first logger.
pub fn init_with_level(level: &str) {
    let filter = level.parse().unwrap_or(log::LevelFilter::Info);
    if let Err(err) = env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .try_init()
    {
        log::debug!("Keeping the existing logger: {}", err);
    }
}
