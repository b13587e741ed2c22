//! The `config` file: a version header followed by TOML settings.
//!
//! ```text
//! 0.1.0
//!
//! debug = false
//! rotate = true
//! ```
//!
//! `guet init` writes only the header (version line and a blank line); missing
//! settings take their defaults.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::files::{read_lines, write_atomic};

/// User-tunable behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Log at `debug` level unless `RUST_LOG` says otherwise.
    pub debug: bool,
    /// Rotate the author to the back of the committer set after each commit.
    pub rotate: bool,
}

impl Settings {
    pub const KEYS: [&'static str; 2] = ["debug", "rotate"];

    /// Update one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "debug" => &mut self.debug,
            "rotate" => &mut self.rotate,
            other => {
                return Err(anyhow!(
                    "unknown setting '{other}' (known: {})",
                    Self::KEYS.join(", ")
                ));
            }
        };
        *slot = value
            .trim()
            .parse::<bool>()
            .with_context(|| format!("setting '{key}' expects true or false, got '{value}'"))?;
        Ok(())
    }
}

/// Parsed `config` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub version: String,
    pub settings: Settings,
}

impl ConfigFile {
    pub fn parse(lines: &[String]) -> Result<Self> {
        let (version, rest) = lines
            .split_first()
            .ok_or_else(|| anyhow!("config file is empty (expected a version line)"))?;
        let settings: Settings =
            toml::from_str(&rest.join("\n")).context("parse settings toml")?;
        Ok(Self {
            version: version.trim().to_string(),
            settings,
        })
    }

    pub fn render(&self) -> Result<String> {
        let body = toml::to_string(&self.settings).context("serialize settings toml")?;
        Ok(format!("{}\n\n{}", self.version, body))
    }
}

pub fn load_config(path: &Path) -> Result<ConfigFile> {
    debug!(path = %path.display(), "loading config");
    let lines = read_lines(path)?;
    ConfigFile::parse(&lines).with_context(|| format!("parse {}", path.display()))
}

pub fn write_config(path: &Path, config: &ConfigFile) -> Result<()> {
    write_atomic(path, &config.render()?)
}

/// Settings from `path`, or defaults when the file does not exist yet.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    load_config(path).map(|config| config.settings)
}
