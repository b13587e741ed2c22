//! Configuration directory layout and project root discovery.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

/// Environment variable overriding the configuration directory.
pub const GUET_HOME: &str = "GUET_HOME";

pub const COMMITTER_NAMES: &str = "committernames";
pub const COMMITTERS: &str = "committers";
pub const COMMITTERS_SET: &str = "committersset";
pub const ERRORS: &str = "errors";
pub const CONFIG: &str = "config";

/// Resolve the configuration directory: `$GUET_HOME`, else `$HOME/.guet`.
pub fn configuration_directory() -> Result<PathBuf> {
    if let Some(home) = env::var_os(GUET_HOME).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let home = env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("HOME is not set (set {GUET_HOME} to choose a directory)"))?;
    Ok(PathBuf::from(home).join(".guet"))
}

/// All files guet keeps in its configuration directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuetPaths {
    pub dir: PathBuf,
    pub committer_names: PathBuf,
    pub committers: PathBuf,
    pub committers_set: PathBuf,
    pub errors: PathBuf,
    pub config: PathBuf,
}

impl GuetPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            committer_names: dir.join(COMMITTER_NAMES),
            committers: dir.join(COMMITTERS),
            committers_set: dir.join(COMMITTERS_SET),
            errors: dir.join(ERRORS),
            config: dir.join(CONFIG),
            dir,
        }
    }
}

/// Walk up from `start` to the first directory containing `.git`.
///
/// The result is absolute but not canonicalized, so it keeps the spelling of
/// `start`.
pub fn project_root(start: &Path) -> Result<PathBuf> {
    let start = std::path::absolute(start)
        .with_context(|| format!("resolve absolute path of {}", start.display()))?;
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("no project root above {}", start.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn layout_lives_under_directory() {
        let paths = GuetPaths::new("/home/u/.guet");
        assert_eq!(paths.config, PathBuf::from("/home/u/.guet/config"));
        assert_eq!(
            paths.committers_set,
            PathBuf::from("/home/u/.guet/committersset")
        );
        assert_eq!(
            paths.committer_names,
            PathBuf::from("/home/u/.guet/committernames")
        );
    }

    #[test]
    fn project_root_found_from_nested_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::create_dir(root.join(".git")).expect("create .git");
        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).expect("create nested");

        assert_eq!(project_root(&nested).expect("root"), root);
        assert_eq!(project_root(root).expect("root"), root);
    }

    #[test]
    fn project_root_errors_without_marker() {
        let temp = tempfile::tempdir().expect("tempdir");
        // Temp directories normally live outside any repository.
        if temp.path().ancestors().any(|d| d.join(".git").exists()) {
            return;
        }
        assert!(project_root(temp.path()).is_err());
    }
}
