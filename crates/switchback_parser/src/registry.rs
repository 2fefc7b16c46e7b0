//! Parser registry.
//!
//! Maps type names to [`ParameterType`]s. The first registration of a name
//! wins: later attempts are refused and logged, so a plugin cannot silently
//! change how an existing command parses its arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::builtin::{
    names, BooleanParser, DateTimeParser, FloatParser, FloatWidth, IntegerParser, IntegerWidth, KnownPlayerParser,
    OnlinePlayerParser, StringParser, UuidParser,
};
use crate::capability::{Clock, EntityDirectory, SystemClock};
use crate::parser::{ParameterType, Parser};

/// Runtime storage for parameter types.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    types: HashMap<String, ParameterType>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in type that needs no entity
    /// directory. Dates are read from the system clock in UTC.
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_builtins_and_clock(Arc::new(SystemClock::utc()))
    }

    /// Like [`with_builtins`](Self::with_builtins), reading dates from `clock`.
    #[must_use]
    pub fn with_builtins_and_clock(clock: Arc<dyn Clock>) -> Self {
        let mut registry = Self::new();
        registry.register(names::BOOL, Arc::new(BooleanParser));
        registry.register(names::SHORT, Arc::new(IntegerParser::new(IntegerWidth::Short)));
        registry.register(names::INT, Arc::new(IntegerParser::new(IntegerWidth::Int)));
        registry.register(names::LONG, Arc::new(IntegerParser::new(IntegerWidth::Long)));
        registry.register(names::FLOAT, Arc::new(FloatParser::new(FloatWidth::Float)));
        registry.register(names::DOUBLE, Arc::new(FloatParser::new(FloatWidth::Double)));
        registry.register(names::STRING, Arc::new(StringParser::new()));
        registry.register(names::UUID, Arc::new(UuidParser));
        registry.register(names::DATETIME, Arc::new(DateTimeParser::new(clock)));
        registry
    }

    /// Registers `player` and `offline_player` backed by `directory`.
    ///
    /// Returns false if either name was already taken.
    pub fn register_entity_parsers(&mut self, directory: &Arc<dyn EntityDirectory>) -> bool {
        let online = self.register(names::PLAYER, Arc::new(OnlinePlayerParser::new(Arc::clone(directory))));
        let known = self.register(
            names::OFFLINE_PLAYER,
            Arc::new(KnownPlayerParser::new(Arc::clone(directory))),
        );
        online && known
    }

    /// Registers a parser under a type name.
    ///
    /// Returns false, leaving the registry unchanged, if the name is taken.
    pub fn register(&mut self, name: &str, parser: Arc<dyn Parser>) -> bool {
        if self.types.contains_key(name) {
            tracing::warn!(parameter_type = name, "parser already registered; keeping the first one");
            return false;
        }
        tracing::debug!(parameter_type = name, "registered parser");
        self.types.insert(name.to_string(), ParameterType::new(name, parser));
        true
    }

    /// Rebinds `datetime` to a parser reading `clock`.
    ///
    /// This is the only rebinding the registry allows. Commands compiled
    /// earlier keep the parser they were compiled against, so hosts call it
    /// before registering anything.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        tracing::warn!(parameter_type = names::DATETIME, "rebinding parser to a new clock");
        self.types.insert(
            names::DATETIME.to_string(),
            ParameterType::new(names::DATETIME, Arc::new(DateTimeParser::new(clock))),
        );
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ParameterType> {
        self.types.get(name).cloned()
    }

    /// Returns true if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry").field("types", &self.names()).finish()
    }
}
