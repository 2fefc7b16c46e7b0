use switchback_foundation::{CommandSender, Value};

use crate::filter::{self, FilterError, PatternCache};
use crate::parser::Parser;

/// Accepts any token verbatim. Understands `regex:` filters.
#[derive(Debug, Default)]
pub struct StringParser {
    patterns: PatternCache,
}

impl StringParser {
    /// Creates a string parser with an empty pattern cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parser for StringParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        Some(Value::from(token))
    }

    fn filter(&self, _sender: &dyn CommandSender, value: &Value, expr: &str) -> Result<(), FilterError> {
        match value.as_str() {
            Some(text) => self.patterns.check(text, expr),
            None => Ok(()),
        }
    }

    fn validate_filter(&self, expr: &str) -> Result<(), FilterError> {
        filter::validate_patterns(expr)
    }

    fn display_name(&self) -> Option<&str> {
        Some("String")
    }
}
