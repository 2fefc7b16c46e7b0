//! Value type descriptors.

use std::fmt;

/// Describes the kind of a [`Value`](crate::Value).
///
/// Used by typed argument accessors to report what a handler asked for
/// versus what the router actually parsed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Boolean.
    Bool,
    /// Signed integer (any width).
    Int,
    /// Floating point (any width).
    Float,
    /// Text.
    String,
    /// UUID.
    Uuid,
    /// Calendar date and time with a fixed offset.
    DateTime,
    /// Entity reference.
    Entity,
    /// Values collected by a greedy trailing parameter.
    List,
    /// Domain value produced by a host-supplied parser.
    Custom,
}

impl ValueType {
    /// Returns the lowercase name used in messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::DateTime => "datetime",
            Self::Entity => "entity",
            Self::List => "list",
            Self::Custom => "custom",
        }
    }

    /// Returns true for the numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
