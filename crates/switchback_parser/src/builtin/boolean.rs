use switchback_foundation::{CommandSender, Value};

use crate::parser::Parser;

/// Parses `true` and `false`, ignoring case.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanParser;

impl Parser for BooleanParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        if token.eq_ignore_ascii_case("true") {
            Some(Value::Bool(true))
        } else if token.eq_ignore_ascii_case("false") {
            Some(Value::Bool(false))
        } else {
            None
        }
    }

    fn default_suggestions(&self, _sender: &dyn CommandSender) -> Option<Vec<String>> {
        Some(vec!["true".to_string(), "false".to_string()])
    }

    fn display_name(&self) -> Option<&str> {
        Some("True/False")
    }
}
