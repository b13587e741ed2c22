//! Test-only fixtures: temporary git repositories, recording observers and a
//! recording file system.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::context::SetCommitterObserver;
use crate::core::committer::Committer;
use crate::io::files::{DiskFileSystem, File, FileSystem};

/// Deterministic committer `initials` / `Name initials` / `initials@example.com`.
pub fn committer(initials: &str) -> Committer {
    Committer::new(
        initials,
        format!("Name {initials}"),
        format!("{initials}@example.com"),
    )
    .expect("valid test committer")
}

/// A temp directory that is not inside any git repository, if the platform
/// temp dir allows one.
pub fn outside_any_repo() -> Option<TempDir> {
    let temp = tempfile::tempdir().expect("tempdir");
    let inside = temp
        .path()
        .ancestors()
        .any(|dir| dir.join(".git").exists());
    (!inside).then_some(temp)
}

/// Freshly initialized git repository plus a separate home directory for guet
/// state, both removed on drop.
pub struct TestRepo {
    _temp: TempDir,
    root: PathBuf,
    home: PathBuf,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let root = temp.path().join("repo");
        let home = temp.path().join("home");
        fs::create_dir_all(&root).context("create repo dir")?;
        fs::create_dir_all(&home).context("create home dir")?;

        run_git(&root, &["init", "--quiet"])?;
        run_git(&root, &["config", "user.name", "Test User"])?;
        run_git(&root, &["config", "user.email", "test@example.com"])?;
        run_git(&root, &["config", "commit.gpgsign", "false"])?;

        Ok(Self {
            _temp: temp,
            root,
            home,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scratch directory for guet state (use `home().join(".guet")`).
    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn guet_home(&self) -> PathBuf {
        self.home.join(".guet")
    }

    /// Run git in the repository and return trimmed stdout.
    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(&self.root, args)
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let out = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .with_context(|| format!("spawn git {}", args.join(" ")))?;
    if !out.status.success() {
        return Err(anyhow!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stderr).trim()
        ));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Shared log of `(label, committers)` notifications.
pub type NotificationLog = Rc<RefCell<Vec<(String, Vec<Committer>)>>>;

/// Observer that records every notification into a shared log.
pub struct RecordingObserver {
    label: String,
    log: NotificationLog,
}

impl RecordingObserver {
    pub fn new(label: &str) -> (Self, NotificationLog) {
        let log = NotificationLog::default();
        Self::sharing(label, &log)
    }

    /// Observer writing into an existing log, to check cross-observer order.
    pub fn sharing(label: &str, log: &NotificationLog) -> (Self, NotificationLog) {
        let observer = Self {
            label: label.to_string(),
            log: Rc::clone(log),
        };
        (observer, Rc::clone(log))
    }
}

impl SetCommitterObserver for RecordingObserver {
    fn notify_of_committer_set(&mut self, committers: &[Committer]) -> Result<()> {
        self.log
            .borrow_mut()
            .push((self.label.clone(), committers.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FileSystemLog {
    pub gets: Vec<PathBuf>,
    pub saves: usize,
}

/// [`DiskFileSystem`] that records calls.
pub struct RecordingFileSystem {
    inner: DiskFileSystem,
    log: Rc<RefCell<FileSystemLog>>,
}

impl RecordingFileSystem {
    pub fn new() -> (Self, Rc<RefCell<FileSystemLog>>) {
        let log = Rc::new(RefCell::new(FileSystemLog::default()));
        let fs = Self {
            inner: DiskFileSystem::new(),
            log: Rc::clone(&log),
        };
        (fs, log)
    }
}

impl FileSystem for RecordingFileSystem {
    fn get(&mut self, path: &Path) -> &mut File {
        self.log.borrow_mut().gets.push(path.to_path_buf());
        self.inner.get(path)
    }

    fn save_all(&mut self) -> Result<()> {
        self.log.borrow_mut().saves += 1;
        self.inner.save_all()
    }
}
