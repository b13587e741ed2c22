//! Orchestration for `guet set`: make roster committers the current set.

use anyhow::Result;
use tracing::debug;

use crate::context::Context;
use crate::io::committers::RosterError;

/// Look up `initials` in the roster and make them the project's committers,
/// first initials as author. Returns the committer names.
pub fn set_by_initials<S: AsRef<str>>(context: &mut Context, initials: &[S]) -> Result<Vec<String>> {
    for (idx, wanted) in initials.iter().enumerate() {
        let wanted = wanted.as_ref();
        if initials[..idx].iter().any(|seen| seen.as_ref() == wanted) {
            return Err(RosterError::RepeatedInitials(wanted.to_string()).into());
        }
    }
    let committers = context.committers().by_initials(initials)?;
    debug!(count = committers.len(), "committers looked up");
    context.set_committers(&committers)
}
