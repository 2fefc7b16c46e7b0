//! Host capabilities that parsers call through.
//!
//! Parsers never reach for global server state. Entity lookups go through an
//! [`EntityDirectory`] and "now" comes from a [`Clock`], both injected when
//! the parser is constructed.

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, Utc};
use parking_lot::RwLock;
use switchback_foundation::EntityRef;
use uuid::Uuid;

/// Looks up entities known to the host.
pub trait EntityDirectory: Send + Sync {
    /// Finds a connected entity by exact name (ASCII case-insensitive).
    fn online(&self, name: &str) -> Option<EntityRef>;

    /// Names of every connected entity.
    fn online_names(&self) -> Vec<String>;

    /// Finds an entity that has ever been seen, connected or not.
    fn known(&self, name: &str) -> Option<EntityRef>;
}

/// Supplies the current time.
pub trait Clock: Send + Sync {
    /// Returns "now".
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The system clock, reported in a fixed offset.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// System time in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// System time in the given offset.
    #[must_use]
    pub const fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock stopped at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// An in-memory directory.
///
/// Entities are added with [`connect`](Self::connect); a disconnected entity
/// stays known.
#[derive(Default)]
pub struct MemoryDirectory {
    entities: RwLock<Vec<(EntityRef, bool)>>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory with the given names connected.
    #[must_use]
    pub fn with_online<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directory = Self::new();
        for name in names {
            directory.connect(name.as_ref());
        }
        directory
    }

    /// Marks an entity connected, creating it if it has never been seen.
    pub fn connect(&self, name: &str) -> EntityRef {
        let mut entities = self.entities.write();
        if let Some((entity, online)) = entities
            .iter_mut()
            .find(|(e, _)| e.name().eq_ignore_ascii_case(name))
        {
            *online = true;
            return entity.clone();
        }
        let entity = EntityRef::new(Uuid::new_v4(), name);
        entities.push((entity.clone(), true));
        entity
    }

    /// Marks an entity disconnected. Returns false if it was not connected.
    pub fn disconnect(&self, name: &str) -> bool {
        self.entities
            .write()
            .iter_mut()
            .find(|(e, online)| *online && e.name().eq_ignore_ascii_case(name))
            .map(|(_, online)| *online = false)
            .is_some()
    }

    fn find(&self, name: &str, online_only: bool) -> Option<EntityRef> {
        self.entities
            .read()
            .iter()
            .find(|(e, online)| (*online || !online_only) && e.name().eq_ignore_ascii_case(name))
            .map(|(e, _)| e.clone())
    }
}

impl EntityDirectory for MemoryDirectory {
    fn online(&self, name: &str) -> Option<EntityRef> {
        self.find(name, true)
    }

    fn online_names(&self) -> Vec<String> {
        self.entities
            .read()
            .iter()
            .filter(|(_, online)| *online)
            .map(|(e, _)| e.name().to_string())
            .collect()
    }

    fn known(&self, name: &str) -> Option<EntityRef> {
        self.find(name, false)
    }
}

impl fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDirectory")
            .field("entities", &self.entities.read().len())
            .finish()
    }
}
