//! Diagnostic tracing for guet.
//!
//! Output goes to stderr so it never mixes with command output or with text
//! git reads back from hooks. User-facing failures are also appended to the
//! `errors` file by the CLI; that file is unaffected by the log level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the level is `debug` when the `debug`
/// setting is on and `warn` when it is off.
///
/// # Example
/// ```bash
/// RUST_LOG=guet=trace guet set aa bb
/// ```
pub fn init(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
