//! Append-only log of command failures (`errors` in the configuration directory).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Append `<epoch-millis> <message>` to `path`. Multi-line messages are folded.
pub fn record_error(path: &Path, message: &str) -> Result<()> {
    let folded = message.lines().collect::<Vec<_>>().join(" | ");
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    writeln!(file, "{} {}", epoch_millis(), folded)
        .with_context(|| format!("append {}", path.display()))
}
