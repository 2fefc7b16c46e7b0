//! The sender capability.
//!
//! The host owns identity and permission storage. For each invocation it
//! hands the router a [`CommandSender`], and the router only ever calls
//! through it: to check a permission, to learn what kind of issuer it is
//! talking to, and to report back.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

/// What kind of issuer sent a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SenderKind {
    /// A connected player.
    Player,
    /// The server console or an operator terminal.
    Console,
    /// A scripted or automated source (command blocks, schedulers, bots).
    Automation,
}

impl SenderKind {
    /// Returns the lowercase name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Console => "console",
            Self::Automation => "automation",
        }
    }
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity and capabilities of a command issuer.
///
/// Implementations must be cheap to call from worker threads: matching runs
/// off the host's primary loop.
pub trait CommandSender: Send + Sync {
    /// Display name.
    fn name(&self) -> &str;

    /// Kind of issuer.
    fn kind(&self) -> SenderKind;

    /// Stable id, if the issuer is an entity.
    fn id(&self) -> Option<Uuid> {
        None
    }

    /// Evaluates a permission node.
    fn has_permission(&self, permission: &str) -> bool;

    /// Delivers a line of feedback.
    fn send_message(&self, message: &str);
}

/// Shared handle to a sender.
pub type SenderHandle = Arc<dyn CommandSender>;

/// A sender that keeps every message it receives.
///
/// Useful for tests, batch tools, and anything that needs to inspect what
/// the router said.
pub struct RecordingSender {
    name: String,
    kind: SenderKind,
    id: Option<Uuid>,
    permissions: HashSet<String>,
    all_permissions: bool,
    messages: Mutex<Vec<String>>,
}

impl RecordingSender {
    /// Creates a sender with no permissions.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SenderKind) -> Self {
        Self {
            name: name.into(),
            kind,
            id: None,
            permissions: HashSet::new(),
            all_permissions: false,
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Creates a player sender with a fresh id.
    #[must_use]
    pub fn player(name: impl Into<String>) -> Self {
        Self::new(name, SenderKind::Player).with_id(Uuid::new_v4())
    }

    /// Creates a console sender holding every permission.
    #[must_use]
    pub fn console() -> Self {
        Self::new("CONSOLE", SenderKind::Console).with_all_permissions()
    }

    /// Sets the entity id.
    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Grants a single permission node.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Grants every permission.
    #[must_use]
    pub fn with_all_permissions(mut self) -> Self {
        self.all_permissions = true;
        self
    }

    /// Returns a copy of every message received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Removes and returns every message received so far.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Wraps the sender in a shareable handle.
    #[must_use]
    pub fn into_handle(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl CommandSender for RecordingSender {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SenderKind {
        self.kind
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.all_permissions || self.permissions.contains(permission)
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

impl fmt::Debug for RecordingSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingSender")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
