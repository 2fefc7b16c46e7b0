use switchback_foundation::{CommandSender, Value};
use uuid::Uuid;

use crate::parser::Parser;

const HYPHENATED_LEN: usize = 36;

/// Parses hyphenated UUIDs such as `67e55044-10b1-426f-9247-bb680e5fe0c8`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidParser;

impl Parser for UuidParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        if token.len() != HYPHENATED_LEN {
            return None;
        }
        Uuid::try_parse(token).ok().map(Value::Uuid)
    }

    fn display_name(&self) -> Option<&str> {
        Some("UUID")
    }
}
