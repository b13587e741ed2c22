//! Pair and mob programming bookkeeping for git repositories.
//!
//! `guet` keeps a roster of committers, records which of them are currently
//! working in a project, installs git hooks that append `Co-authored-by`
//! trailers, and stores its state under a configuration directory
//! (`$GUET_HOME`, or `~/.guet`).
//!
//! - **[`core`]**: Pure logic (committer records, set records, trailers).
//! - **[`io`]**: Filesystem, git and configuration-directory access.
//! - **[`context`]**: The [`context::Context`] that lazily wires git and the
//!   committer roster together and fans out committer-set changes.
//!
//! Orchestration modules ([`start`], [`set`], [`hook`]) coordinate the context
//! with I/O to implement CLI commands.

pub mod context;
pub mod core;
pub mod exit_codes;
pub mod hook;
pub mod io;
pub mod logging;
pub mod set;
pub mod start;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Version stamped into the `config` file by `guet init`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
