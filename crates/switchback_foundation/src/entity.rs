//! Entity references produced by the entity-lookup parsers.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// A handle to an entity (usually a player) known to the host.
///
/// The router never owns entity state. A reference is a snapshot of the
/// identity the host's directory returned at parse time: a stable id plus
/// the display name the entity had then.
///
/// Equality and hashing use the id only, so a renamed entity is still the
/// same entity.
#[derive(Clone)]
pub struct EntityRef {
    /// Stable identifier.
    pub id: Uuid,
    /// Display name at lookup time.
    pub name: Arc<str>,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub fn new(id: Uuid, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityRef {}

impl std::hash::Hash for EntityRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({} {})", self.name, self.id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
