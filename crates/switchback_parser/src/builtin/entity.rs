use std::fmt;
use std::sync::Arc;

use switchback_foundation::{CommandSender, Value};

use crate::capability::EntityDirectory;
use crate::parser::Parser;

const MIN_NAME_LEN: usize = 3;

/// Resolves the name of a connected player.
pub struct OnlinePlayerParser {
    directory: Arc<dyn EntityDirectory>,
}

impl OnlinePlayerParser {
    /// Creates a parser backed by `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn EntityDirectory>) -> Self {
        Self { directory }
    }
}

impl Parser for OnlinePlayerParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        self.directory.online(token).map(Value::Entity)
    }

    fn default_suggestions(&self, _sender: &dyn CommandSender) -> Option<Vec<String>> {
        Some(self.directory.online_names())
    }

    fn display_name(&self) -> Option<&str> {
        Some("Player")
    }
}

/// Resolves the name of any player the directory has seen.
///
/// Known-player lookups can hit storage, so completion only checks that the
/// token is long enough to be a name.
pub struct KnownPlayerParser {
    directory: Arc<dyn EntityDirectory>,
}

impl KnownPlayerParser {
    /// Creates a parser backed by `directory`.
    #[must_use]
    pub fn new(directory: Arc<dyn EntityDirectory>) -> Self {
        Self { directory }
    }
}

impl Parser for KnownPlayerParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        self.directory.known(token).map(Value::Entity)
    }

    fn likely_match(&self, _sender: &dyn CommandSender, token: &str, _filter: Option<&str>) -> bool {
        token.chars().count() >= MIN_NAME_LEN
    }

    fn display_name(&self) -> Option<&str> {
        Some("Player")
    }
}

impl fmt::Debug for OnlinePlayerParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnlinePlayerParser").finish_non_exhaustive()
    }
}

impl fmt::Debug for KnownPlayerParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnownPlayerParser").finish_non_exhaustive()
    }
}
