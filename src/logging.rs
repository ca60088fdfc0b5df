//! Logger boundary.
//!
//! The engine reports through an optional [`Logger`]. The default,
//! [`TracingLogger`], turns each message into a `tracing` event; install a
//! subscriber (for example with [`init_tracing`]) to see them. Whether a
//! logger is present never changes what an operation returns.

use std::error::Error;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Filter used by [`init_tracing`] when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "persista=info";

/// Sink for leveled engine messages.
pub trait Logger: Send + Sync + 'static {
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn Error + 'static)>);
}

/// Forwards every message to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

macro_rules! emit {
    ($macro:ident, $message:expr, $cause:expr) => {
        match $cause {
            Some(e) => tracing::$macro!(error = %e, "{}", $message),
            None => tracing::$macro!("{}", $message),
        }
    };
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, message: &str, cause: Option<&(dyn Error + 'static)>) {
        match level {
            Level::ERROR => emit!(error, message, cause),
            Level::WARN => emit!(warn, message, cause),
            Level::INFO => emit!(info, message, cause),
            Level::DEBUG => emit!(debug, message, cause),
            _ => emit!(trace, message, cause),
        }
    }
}

/// Install a fmt subscriber honoring `RUST_LOG`.
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
