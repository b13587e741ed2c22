use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by [`super::Context`] itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("at least one committer must be given")]
    InvalidCommitters,
    #[error("guet is already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),
}
