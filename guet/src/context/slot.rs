//! One-shot lazy resolution.

/// State of a lazily resolved value.
///
/// Moves from `Unresolved` to `Resolved` or `Failed` at most once, on the
/// first [`Slot::resolve_once`] call. A failed resolution is remembered and
/// never retried.
#[derive(Debug)]
pub enum Slot<T> {
    Unresolved,
    Resolved(T),
    Failed,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::Unresolved
    }
}

impl<T> Slot<T> {
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Resolved(value) => Some(value),
            _ => None,
        }
    }

    /// Run `resolve` if this slot has never been resolved, then return the value.
    pub fn resolve_once(&mut self, resolve: impl FnOnce() -> Option<T>) -> Option<&mut T> {
        if self.is_unresolved() {
            *self = match resolve() {
                Some(value) => Self::Resolved(value),
                None => Self::Failed,
            };
        }
        self.get_mut()
    }
}
