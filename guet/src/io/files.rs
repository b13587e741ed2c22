//! Line-oriented file access with batched persistence.
//!
//! A [`FileSystem`] hands out cached [`File`] handles by path. Reads load from
//! disk lazily (a missing file reads as empty), writes only touch the cache,
//! and [`FileSystem::save_all`] persists every touched handle in one pass.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Read a text file as lines, dropping the empty line after a trailing `\n`.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(split_lines(&text))
}

fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Write `contents` via a temp file and rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Cached handle for one file.
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
    content: Option<String>,
    dirty: bool,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: None,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current lines, loading from disk on first use. Missing files read as empty.
    pub fn read(&mut self) -> Result<Vec<String>> {
        if self.content.is_none() {
            let text = match fs::read_to_string(&self.path) {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => String::new(),
                Err(err) => {
                    return Err(err).with_context(|| format!("read {}", self.path.display()));
                }
            };
            self.content = Some(text);
        }
        Ok(self.content.as_deref().map(split_lines).unwrap_or_default())
    }

    /// Replace the cached contents. Each line carries its own terminator.
    pub fn write<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content: String = lines.into_iter().map(|l| l.as_ref().to_string()).collect();
        self.content = Some(content);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the handle. Untouched files are only created when missing.
    pub fn save(&mut self) -> Result<()> {
        match &self.content {
            Some(content) if self.dirty || !self.path.exists() => {
                write_atomic(&self.path, content)?;
            }
            None if !self.path.exists() => write_atomic(&self.path, "")?,
            _ => {}
        }
        self.dirty = false;
        Ok(())
    }
}

/// Source of file handles.
pub trait FileSystem {
    /// Open-or-create handle for `path`; repeated calls return the same handle.
    fn get(&mut self, path: &Path) -> &mut File;

    /// Persist every handle obtained from [`FileSystem::get`].
    fn save_all(&mut self) -> Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Default)]
pub struct DiskFileSystem {
    files: Vec<File>,
}

impl DiskFileSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSystem for DiskFileSystem {
    fn get(&mut self, path: &Path) -> &mut File {
        let idx = match self.files.iter().position(|f| f.path() == path) {
            Some(idx) => idx,
            None => {
                self.files.push(File::new(path));
                self.files.len() - 1
            }
        };
        &mut self.files[idx]
    }

    fn save_all(&mut self) -> Result<()> {
        debug!(count = self.files.len(), "saving files");
        for file in &mut self.files {
            file.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_lines_splits_on_newlines() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lines");
        fs::write(&path, "Line1\nLine2").expect("write");
        assert_eq!(read_lines(&path).expect("read"), vec!["Line1", "Line2"]);
    }

    #[test]
    fn read_lines_drops_single_trailing_empty_line() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lines");
        fs::write(&path, "Line1\nLine2\n").expect("write");
        assert_eq!(read_lines(&path).expect("read"), vec!["Line1", "Line2"]);

        fs::write(&path, "Line1\n\n").expect("write");
        assert_eq!(read_lines(&path).expect("read"), vec!["Line1", ""]);
    }

    #[test]
    fn read_lines_accepts_str_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("lines");
        fs::write(&path, "only\n").expect("write");
        let as_str = path.to_str().expect("utf-8 path");
        assert_eq!(read_lines(as_str).expect("read"), vec!["only"]);
    }

    #[test]
    fn missing_file_reads_empty_and_is_created_on_save() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("new");
        let mut fs_handle = DiskFileSystem::new();

        assert!(fs_handle.get(&path).read().expect("read").is_empty());
        assert!(!path.exists());

        fs_handle.save_all().expect("save");
        assert_eq!(fs::read_to_string(&path).expect("read back"), "");
    }

    #[test]
    fn writes_are_batched_until_save_all() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config");
        let mut fs_handle = DiskFileSystem::new();

        fs_handle.get(&path).write(["1.0.0\n", "\n"]);
        assert!(fs_handle.get(&path).is_dirty());
        assert!(!path.exists());

        fs_handle.save_all().expect("save");
        assert_eq!(fs::read_to_string(&path).expect("read back"), "1.0.0\n\n");
        assert!(!fs_handle.get(&path).is_dirty());
    }

    #[test]
    fn save_does_not_clobber_unread_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("committers");
        fs::write(&path, "ab,Ada,ada@example.com\n").expect("write");

        let mut fs_handle = DiskFileSystem::new();
        fs_handle.get(&path);
        fs_handle.save_all().expect("save");

        assert_eq!(
            fs::read_to_string(&path).expect("read back"),
            "ab,Ada,ada@example.com\n"
        );
    }
}
