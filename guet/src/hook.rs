//! Handlers behind the installed git hooks (`guet hook <name>`).

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::context::Context;
use crate::core::committers_set::rotate;
use crate::core::trailers::append_co_author_trailers;
use crate::io::files::write_atomic;
use crate::io::settings::Settings;

/// The project has no current committers, so a commit would be unattributed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no committers set for this project; run `guet set <initials>...` first")]
pub struct NoCommittersSet;

/// Git hooks guet answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    PreCommit,
    CommitMsg,
    PostCommit,
}

impl Hook {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "pre-commit" => Ok(Self::PreCommit),
            "commit-msg" => Ok(Self::CommitMsg),
            "post-commit" => Ok(Self::PostCommit),
            other => bail!("unsupported hook '{other}'"),
        }
    }
}

/// Run `hook`. `message_file` is the commit message path git passes to `commit-msg`.
pub fn run_hook(
    context: &mut Context,
    settings: &Settings,
    hook: Hook,
    message_file: Option<&Path>,
) -> Result<()> {
    match hook {
        Hook::PreCommit => pre_commit(context),
        Hook::CommitMsg => {
            let file = message_file.context("commit-msg needs the commit message file")?;
            commit_msg(context, file)
        }
        Hook::PostCommit => post_commit(context, settings),
    }
}

/// Refuse the commit when nobody is set for the project.
pub fn pre_commit(context: &mut Context) -> Result<()> {
    if context.committers().current()?.is_empty() {
        return Err(NoCommittersSet.into());
    }
    Ok(())
}

/// Add `Co-authored-by` trailers for everyone but the author.
#[instrument(skip_all, fields(file = %message_file.display()))]
pub fn commit_msg(context: &mut Context, message_file: &Path) -> Result<()> {
    let current = context.committers().current()?;
    let Some((_, co_authors)) = current.split_first() else {
        debug!("no current committers, message left alone");
        return Ok(());
    };
    let message = fs::read_to_string(message_file)
        .with_context(|| format!("read {}", message_file.display()))?;
    let updated = append_co_author_trailers(&message, co_authors);
    if updated != message {
        write_atomic(message_file, &updated)?;
        debug!(count = co_authors.len(), "co-author trailers appended");
    }
    Ok(())
}

/// With `rotate` on, make the next committer the author of the next commit.
pub fn post_commit(context: &mut Context, settings: &Settings) -> Result<()> {
    if !settings.rotate {
        return Ok(());
    }
    let current = context.committers().current()?;
    if current.len() < 2 {
        return Ok(());
    }
    let names = context.set_committers(&rotate(&current))?;
    info!(committers = %names.join(", "), "committers rotated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::committer::Committer;
    use crate::io::files::DiskFileSystem;
    use crate::test_support::{TestRepo, committer};

    fn context_with_pair(repo: &TestRepo) -> Context {
        let mut context = Context::new(
            Some(repo.root().to_path_buf()),
            Box::new(DiskFileSystem::new()),
            repo.guet_home(),
        );
        context.committers().add(committer("aa")).expect("add");
        context.committers().add(committer("bb")).expect("add");
        context
    }

    #[test]
    fn parses_supported_hook_names() {
        assert_eq!(Hook::parse("commit-msg").expect("parse"), Hook::CommitMsg);
        assert!(Hook::parse("pre-push").is_err());
    }

    #[test]
    fn pre_commit_requires_current_committers() {
        let repo = TestRepo::new().expect("repo");
        let mut context = context_with_pair(&repo);

        let err = pre_commit(&mut context).unwrap_err();
        assert!(err.is::<NoCommittersSet>());

        context.set_committers(&[committer("aa")]).expect("set");
        pre_commit(&mut context).expect("pre-commit");
    }

    #[test]
    fn commit_msg_credits_everyone_but_the_author() {
        let repo = TestRepo::new().expect("repo");
        let mut context = context_with_pair(&repo);
        context
            .set_committers(&[committer("aa"), committer("bb")])
            .expect("set");
        let file = repo.root().join("COMMIT_EDITMSG");
        fs::write(&file, "Add widget\n").expect("write");

        commit_msg(&mut context, &file).expect("commit-msg");
        commit_msg(&mut context, &file).expect("commit-msg again");

        assert_eq!(
            fs::read_to_string(&file).expect("read"),
            "Add widget\n\nCo-authored-by: Name bb <bb@example.com>\n"
        );
    }

    #[test]
    fn commit_msg_without_committers_leaves_message() {
        let repo = TestRepo::new().expect("repo");
        let mut context = context_with_pair(&repo);
        let file = repo.root().join("COMMIT_EDITMSG");
        fs::write(&file, "Solo\n").expect("write");

        commit_msg(&mut context, &file).expect("commit-msg");
        assert_eq!(fs::read_to_string(&file).expect("read"), "Solo\n");
    }

    #[test]
    fn post_commit_rotates_only_when_enabled() {
        let repo = TestRepo::new().expect("repo");
        let mut context = context_with_pair(&repo);
        context
            .set_committers(&[committer("aa"), committer("bb")])
            .expect("set");

        post_commit(&mut context, &Settings::default()).expect("post-commit");
        let initials = |c: Vec<Committer>| -> Vec<String> {
            c.iter().map(|c| c.initials().to_string()).collect()
        };
        assert_eq!(
            initials(context.committers().current().expect("current")),
            vec!["aa", "bb"]
        );

        let rotating = Settings {
            rotate: true,
            ..Settings::default()
        };
        post_commit(&mut context, &rotating).expect("post-commit");
        assert_eq!(
            initials(context.committers().current().expect("current")),
            vec!["bb", "aa"]
        );
        assert_eq!(
            context.git().expect("git").author().expect("author"),
            Some(("Name bb".to_string(), "bb@example.com".to_string()))
        );
    }
}
