//! Stable exit codes for guet CLI commands.

use crate::context::ContextError;
use crate::hook::NoCommittersSet;
use crate::io::committers::RosterError;
use crate::io::git::NoGitPresent;
use crate::io::hooks::HookConflict;

/// Command succeeded.
pub const OK: i32 = 0;
/// Any failure without a more specific code.
pub const FAILURE: i32 = 1;
/// `guet init` found an existing configuration directory.
pub const ALREADY_INITIALIZED: i32 = 2;
/// Empty committer list, or initials not in the roster.
pub const INVALID_COMMITTERS: i32 = 3;
/// `pre-commit` ran with no current committers for the project.
pub const NO_COMMITTERS_SET: i32 = 4;
/// The command needs a git repository and none was found.
pub const NOT_A_REPOSITORY: i32 = 5;
/// `guet start` refused to replace hooks it did not write.
pub const HOOK_CONFLICT: i32 = 6;

/// Exit code for a failed command, from the typed error in its chain.
pub fn for_error(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<ContextError>() {
            return match err {
                ContextError::AlreadyInitialized(_) => ALREADY_INITIALIZED,
                ContextError::InvalidCommitters => INVALID_COMMITTERS,
            };
        }
        if let Some(err) = cause.downcast_ref::<RosterError>() {
            return match err {
                RosterError::UnknownInitials(_) | RosterError::RepeatedInitials(_) => {
                    INVALID_COMMITTERS
                }
                RosterError::NoProjectRoot => NOT_A_REPOSITORY,
                RosterError::DuplicateInitials(_) => FAILURE,
            };
        }
        if cause.is::<NoCommittersSet>() {
            return NO_COMMITTERS_SET;
        }
        if cause.is::<NoGitPresent>() {
            return NOT_A_REPOSITORY;
        }
        if cause.is::<HookConflict>() {
            return HOOK_CONFLICT;
        }
    }
    FAILURE
}
