//! Git adapter: repository discovery, hook installation and author config.
//!
//! Everything goes through the `git` binary so the user's own git
//! configuration applies.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::hooks::{HOOK_NAMES, HookInstall, HookStrategy, install_hook, preflight};
use crate::context::SetCommitterObserver;
use crate::core::committer::Committer;

/// No git repository at the project root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no git repository found{}", .root.as_ref().map(|r| format!(" at {}", r.display())).unwrap_or_default())]
pub struct NoGitPresent {
    pub root: Option<PathBuf>,
}

/// Handle on the git repository of a project.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
    git_dir: PathBuf,
}

impl Git {
    /// Open the repository rooted at `project_root`.
    ///
    /// `.git` may be a directory or a `gitdir:` pointer file (worktrees,
    /// submodules).
    pub fn new(project_root: Option<&Path>) -> Result<Self, NoGitPresent> {
        let missing = || NoGitPresent {
            root: project_root.map(Path::to_path_buf),
        };
        let root = project_root.ok_or_else(missing)?;
        let dot_git = root.join(".git");
        let git_dir = if dot_git.is_dir() {
            dot_git
        } else if dot_git.is_file() {
            read_gitdir_pointer(&dot_git).ok_or_else(missing)?
        } else {
            return Err(missing());
        };
        debug!(workdir = %root.display(), git_dir = %git_dir.display(), "git repository found");
        Ok(Self {
            workdir: root.to_path_buf(),
            git_dir,
        })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.git_dir.join("hooks")
    }

    /// Install the guet hooks. With [`HookStrategy::Create`] nothing is written
    /// unless every hook can be installed.
    #[instrument(skip_all, fields(strategy = ?strategy))]
    pub fn create_hooks(&self, strategy: HookStrategy) -> Result<Vec<(String, HookInstall)>> {
        let hooks_dir = self.hooks_dir();
        fs::create_dir_all(&hooks_dir)
            .with_context(|| format!("create hooks directory {}", hooks_dir.display()))?;
        preflight(&hooks_dir, strategy)?;

        let mut installed = Vec::with_capacity(HOOK_NAMES.len());
        for hook in HOOK_NAMES {
            let outcome = install_hook(&hooks_dir, hook, strategy)?;
            debug!(hook, outcome = ?outcome, "hook installed");
            installed.push((hook.to_string(), outcome));
        }
        info!(hooks_dir = %hooks_dir.display(), "hooks installed");
        Ok(installed)
    }

    /// Make `committer` the author of new commits in this repository.
    #[instrument(skip_all, fields(initials = committer.initials()))]
    pub fn set_author(&self, committer: &Committer) -> Result<()> {
        self.run_checked(&["config", "--local", "user.name", committer.name()])?;
        self.run_checked(&["config", "--local", "user.email", committer.email()])?;
        debug!("author updated");
        Ok(())
    }

    /// Local `user.name`/`user.email`, if both are set.
    pub fn author(&self) -> Result<Option<(String, String)>> {
        let name = self.config_value("user.name")?;
        let email = self.config_value("user.email")?;
        Ok(name.zip(email))
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.run(&["config", "--local", "--get", key])?;
        // Exit status 1 means the key is unset.
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git config --get {key} failed: {}", stderr.trim()));
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("git {} failed: {}", args.join(" "), stderr.trim()));
        }
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))
    }
}

impl SetCommitterObserver for Git {
    fn notify_of_committer_set(&mut self, committers: &[Committer]) -> Result<()> {
        match committers.first() {
            Some(author) => self.set_author(author),
            None => Ok(()),
        }
    }
}

fn read_gitdir_pointer(dot_git: &Path) -> Option<PathBuf> {
    let text = fs::read_to_string(dot_git).ok()?;
    let target = text
        .lines()
        .find_map(|line| line.strip_prefix("gitdir:"))?
        .trim();
    let target = PathBuf::from(target);
    let resolved = if target.is_absolute() {
        target
    } else {
        dot_git.parent()?.join(target)
    };
    resolved.is_dir().then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestRepo;

    #[test]
    fn missing_root_or_dot_git_is_no_git_present() {
        let err = Git::new(None).unwrap_err();
        assert_eq!(err, NoGitPresent { root: None });

        let temp = tempfile::tempdir().expect("tempdir");
        let err = Git::new(Some(temp.path())).unwrap_err();
        assert_eq!(err.root.as_deref(), Some(temp.path()));
        assert!(err.to_string().contains("no git repository found at"));
    }

    #[test]
    fn follows_gitdir_pointer_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let real = temp.path().join("real.git");
        fs::create_dir_all(&real).expect("create git dir");
        let work = temp.path().join("work");
        fs::create_dir_all(&work).expect("create work");
        fs::write(work.join(".git"), "gitdir: ../real.git\n").expect("write pointer");

        let git = Git::new(Some(&work)).expect("git");
        assert_eq!(git.hooks_dir(), work.join("../real.git").join("hooks"));
    }

    #[test]
    fn notify_sets_first_committer_as_author() {
        let repo = TestRepo::new().expect("repo");
        let mut git = Git::new(Some(repo.root())).expect("git");
        let author = Committer::new("aa", "Ann Author", "ann@example.com").expect("c");
        let other = Committer::new("bb", "Bob", "bob@example.com").expect("c");

        git.notify_of_committer_set(&[author, other]).expect("notify");

        assert_eq!(
            git.author().expect("author"),
            Some(("Ann Author".to_string(), "ann@example.com".to_string()))
        );
    }
}
