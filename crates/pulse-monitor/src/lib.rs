//! Logging and diagnostics output.

mod logging;

pub use logging::{setup_logging, LogFormat, LoggingError, LoggingOptions};
pub use tracing_appender::non_blocking::WorkerGuard;
