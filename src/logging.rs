//! Subscriber setup for the command line tool. The library only emits events.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a stderr subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` the level is `info`, or `debug` when `verbose` is set. Calling this
/// twice is harmless; the second install attempt is ignored.
pub fn init_logging(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let stderr_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false);

  let _ = tracing_subscriber::registry()
    .with(filter)
    .with(stderr_layer)
    .try_init();
}
