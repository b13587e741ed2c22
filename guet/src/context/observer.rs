//! Committer-set change notification.

use anyhow::Result;

use crate::core::committer::Committer;

/// Reacts to a new set of active committers.
pub trait SetCommitterObserver {
    /// Called with the complete new set, author first. Never called with an empty set.
    fn notify_of_committer_set(&mut self, committers: &[Committer]) -> Result<()>;
}

/// Which kind of observer occupies a registration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverKind {
    Git,
    Committers,
    External,
}

/// A registration entry. `Git` and `Committers` refer to the handles owned by
/// the context; external observers are owned by the entry.
pub(crate) enum ObserverSlot {
    Git,
    Committers,
    External(Box<dyn SetCommitterObserver>),
}

impl ObserverSlot {
    pub(crate) fn kind(&self) -> ObserverKind {
        match self {
            Self::Git => ObserverKind::Git,
            Self::Committers => ObserverKind::Committers,
            Self::External(_) => ObserverKind::External,
        }
    }
}
