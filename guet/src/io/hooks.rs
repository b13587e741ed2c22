//! Hook scripts that forward git hooks to `guet hook <name>`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use thiserror::Error;

use super::files::write_atomic;

pub const HOOK_NAMES: [&str; 3] = ["pre-commit", "commit-msg", "post-commit"];

/// First line after the shebang of every script guet writes.
pub const GUET_MARKER: &str = "# guet-managed hook";

const HOOK_TEMPLATE: &str = include_str!("../../templates/hook.sh.j2");

/// What to do when a hook file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStrategy {
    /// Refuse to touch hooks guet did not write.
    Create,
    /// Replace existing hooks.
    Overwrite,
    /// Append the guet invocation to existing hooks.
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookInstall {
    Created,
    Overwritten,
    Appended,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hooks not written by guet already exist: {}; rerun with --overwrite or --append", .0.join(", "))]
pub struct HookConflict(pub Vec<String>);

/// Shell line that hands a hook over to guet.
pub fn invocation(hook: &str) -> String {
    format!("{} hook {hook} \"$@\"", guet_command())
}

/// Render the full script for `hook`.
pub fn render_hook(hook: &str) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("hook", HOOK_TEMPLATE)
        .context("load hook template")?;
    let template = env.get_template("hook").context("get hook template")?;
    template
        .render(context! {
            marker => GUET_MARKER,
            version => crate::VERSION,
            hook => hook,
            invocation => invocation(hook),
        })
        .with_context(|| format!("render {hook} hook"))
}

/// Fail with [`HookConflict`] when `strategy` is `Create` and a foreign hook exists.
pub fn preflight(hooks_dir: &Path, strategy: HookStrategy) -> Result<()> {
    if strategy != HookStrategy::Create {
        return Ok(());
    }
    let mut conflicts = Vec::new();
    for hook in HOOK_NAMES {
        if let Some(existing) = read_existing(&hooks_dir.join(hook))?
            && !existing.contains(GUET_MARKER)
        {
            conflicts.push(hook.to_string());
        }
    }
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(HookConflict(conflicts).into())
    }
}

/// Write one hook according to `strategy`.
pub fn install_hook(hooks_dir: &Path, hook: &str, strategy: HookStrategy) -> Result<HookInstall> {
    let path = hooks_dir.join(hook);
    let existing = read_existing(&path)?;
    let (contents, outcome) = match (existing, strategy) {
        (None, _) => (render_hook(hook)?, HookInstall::Created),
        (Some(current), HookStrategy::Append) if current.contains(GUET_MARKER) => {
            (current, HookInstall::Unchanged)
        }
        (Some(mut current), HookStrategy::Append) => {
            if !current.ends_with('\n') {
                current.push('\n');
            }
            current.push_str(&format!("\n{GUET_MARKER}\n{}\n", invocation(hook)));
            (current, HookInstall::Appended)
        }
        (Some(current), HookStrategy::Create) => {
            if !current.contains(GUET_MARKER) {
                return Err(HookConflict(vec![hook.to_string()]).into());
            }
            (render_hook(hook)?, HookInstall::Overwritten)
        }
        (Some(_), HookStrategy::Overwrite) => (render_hook(hook)?, HookInstall::Overwritten),
    };
    if outcome != HookInstall::Unchanged {
        write_atomic(&path, &contents)?;
    }
    make_executable(&path)?;
    Ok(outcome)
}

fn read_existing(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("read hook {}", path.display()))
}

/// Absolute path of the running binary, quoted for `sh`; `guet` if unknown.
fn guet_command() -> String {
    std::env::current_exe()
        .ok()
        .map(PathBuf::into_os_string)
        .and_then(|p| p.into_string().ok())
        .map(|p| format!("'{}'", p.replace('\'', r"'\''")))
        .unwrap_or_else(|| "guet".to_string())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perm = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .permissions();
    perm.set_mode(0o755);
    fs::set_permissions(path, perm).with_context(|| format!("chmod {}", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
