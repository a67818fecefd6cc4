use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber filtered by `level`, which takes the usual
/// `EnvFilter` directive syntax. An unparsable directive falls back to `info`.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init();
}
