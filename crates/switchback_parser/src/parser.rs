//! The parser plugin interface.
//!
//! A [`Parser`] converts one input token into a [`Value`], checks a parsed
//! value against a filter expression, and proposes completions. Parsers are
//! bound to a type name through a [`ParameterType`] when they are
//! registered, and the router resolves type names to parameter types when a
//! command is registered.

use std::fmt;
use std::sync::Arc;

use switchback_foundation::{CommandSender, Value};

use crate::filter::FilterError;

/// Converts and validates a single token for one parameter type.
///
/// Implementations must be thread-safe: matching runs on worker threads,
/// and one parser instance is shared by every node that uses its type.
pub trait Parser: Send + Sync {
    /// Parses a token, returning `None` if it is not a value of this type.
    fn parse(&self, sender: &dyn CommandSender, token: &str) -> Option<Value>;

    /// Cheap plausibility check used while completing partial input.
    ///
    /// The default parses the token and applies the filter. Parsers whose
    /// `parse` is expensive (directory lookups, network calls) should
    /// override this with something cheaper.
    fn likely_match(&self, sender: &dyn CommandSender, token: &str, filter: Option<&str>) -> bool {
        match self.parse(sender, token) {
            Some(value) => filter.is_none_or(|expr| self.filter(sender, &value, expr).is_ok()),
            None => false,
        }
    }

    /// Checks a parsed value against a filter expression.
    ///
    /// The default accepts every value.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Rejected`] with a user-facing reason when the
    /// value fails the filter, or [`FilterError::Malformed`] when the
    /// expression itself cannot be understood.
    fn filter(&self, sender: &dyn CommandSender, value: &Value, expr: &str) -> Result<(), FilterError> {
        let _ = (sender, value, expr);
        Ok(())
    }

    /// Checks a filter expression when a command is registered.
    ///
    /// The default accepts every expression.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Malformed`] for expressions this parser could
    /// never evaluate.
    fn validate_filter(&self, expr: &str) -> Result<(), FilterError> {
        let _ = expr;
        Ok(())
    }

    /// Completions offered when a command does not override them.
    fn default_suggestions(&self, sender: &dyn CommandSender) -> Option<Vec<String>> {
        let _ = sender;
        None
    }

    /// Name shown in usage lines as `<Name>`.
    fn display_name(&self) -> Option<&str> {
        None
    }
}

/// A type name bound to its parser.
#[derive(Clone)]
pub struct ParameterType {
    name: Arc<str>,
    parser: Arc<dyn Parser>,
}

impl ParameterType {
    /// Binds a parser to a type name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, parser: Arc<dyn Parser>) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }

    /// Returns the registered type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the bound parser.
    #[must_use]
    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    /// Returns the name used in usage lines.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.parser.display_name().unwrap_or(&self.name)
    }
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ParameterType {}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterType({})", self.name)
    }
}
