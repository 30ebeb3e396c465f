//! Typed collection of external analysts. Preserves registration order
//! (the tie-break ordering the consensus protocol relies on) and enforces
//! name uniqueness, including rejection of the reserved host name.

use super::{Participant, HOST_PARTICIPANT_NAME};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("'{0}' is reserved for the host analyst")]
    ReservedName(String),
    #[error("a participant named '{0}' is already registered")]
    DuplicateName(String),
}

/// A mapping from unique participant name to a capability-bearing handle,
/// iterated in registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<(String, Arc<dyn Participant>)>,
    names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external participant. Rejects the reserved host name
    /// and duplicate names before any I/O is scheduled.
    pub fn register(&mut self, name: impl Into<String>, participant: Arc<dyn Participant>) -> Result<(), RegistrationError> {
        let name = name.into();
        if name == HOST_PARTICIPANT_NAME {
            return Err(RegistrationError::ReservedName(name));
        }
        if !self.names.insert(name.clone()) {
            return Err(RegistrationError::DuplicateName(name));
        }
        self.entries.push((name, participant));
        Ok(())
    }

    /// Remove a participant by name. Returns whether one was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        if let Some(pos) = self.entries.iter().position(|(n, _)| n == name) {
            self.entries.remove(pos);
            self.names.remove(name);
            true
        } else {
            false
        }
    }

    /// Registration-order iterator over `(name, participant)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Participant>)> {
        self.entries.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Drop every entry whose name is not in `keep`, preserving relative
    /// order of the survivors. Used to prune preflight failures.
    pub fn retain_names(&mut self, keep: &HashSet<String>) {
        self.entries.retain(|(name, _)| keep.contains(name));
        self.names.retain(|name| keep.contains(name));
    }
}
