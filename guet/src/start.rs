//! Orchestration for `guet start`: install the guet hooks in the project.

use anyhow::{Context as _, Result};
use tracing::info;

use crate::context::Context;
use crate::io::git::NoGitPresent;
use crate::io::hooks::{HookInstall, HookStrategy};

/// Outcome of `guet start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub hooks: Vec<(String, HookInstall)>,
}

/// Install the hooks into the repository of the context's project.
///
/// Fails with [`NoGitPresent`] outside a repository.
pub fn start(context: &mut Context, strategy: HookStrategy) -> Result<StartOutcome> {
    let root = context.project_root_directory().map(|p| p.to_path_buf());
    let git = context.git().ok_or(NoGitPresent { root })?;
    let hooks = git.create_hooks(strategy).context("install hooks")?;
    info!(count = hooks.len(), "guet started");
    Ok(StartOutcome { hooks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::files::DiskFileSystem;
    use crate::io::hooks::{GUET_MARKER, HOOK_NAMES, HookConflict};
    use crate::test_support::{TestRepo, outside_any_repo};
    use std::fs;

    fn context_for(repo: &TestRepo) -> Context {
        Context::new(
            Some(repo.root().to_path_buf()),
            Box::new(DiskFileSystem::new()),
            repo.guet_home(),
        )
    }

    #[test]
    fn installs_every_hook() {
        let repo = TestRepo::new().expect("repo");
        let mut context = context_for(&repo);

        let outcome = start(&mut context, HookStrategy::Create).expect("start");

        assert_eq!(outcome.hooks.len(), HOOK_NAMES.len());
        for hook in HOOK_NAMES {
            let script = fs::read_to_string(repo.root().join(".git/hooks").join(hook))
                .expect("read hook");
            assert!(script.contains(GUET_MARKER));
        }
    }

    #[test]
    fn foreign_hook_blocks_create_but_not_overwrite() {
        let repo = TestRepo::new().expect("repo");
        let hooks = repo.root().join(".git/hooks");
        fs::create_dir_all(&hooks).expect("hooks dir");
        fs::write(hooks.join("commit-msg"), "#!/bin/sh\nexit 0\n").expect("write");
        let mut context = context_for(&repo);

        let err = start(&mut context, HookStrategy::Create).unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<HookConflict>()));
        assert!(!hooks.join("pre-commit").exists());

        let outcome = start(&mut context, HookStrategy::Overwrite).expect("overwrite");
        assert!(
            outcome
                .hooks
                .contains(&("commit-msg".to_string(), HookInstall::Overwritten))
        );
    }

    #[test]
    fn outside_a_repository_is_no_git_present() {
        let Some(outside) = outside_any_repo() else {
            return;
        };
        let mut context = Context::new(
            Some(outside.path().to_path_buf()),
            Box::new(DiskFileSystem::new()),
            outside.path().join(".guet"),
        );
        let err = start(&mut context, HookStrategy::Create).unwrap_err();
        assert!(err.is::<NoGitPresent>());
    }
}
