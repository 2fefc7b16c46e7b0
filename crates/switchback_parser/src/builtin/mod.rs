//! Built-in parameter types.
//!
//! | Type name        | Parser                 | Value      | Shown as     |
//! |------------------|------------------------|------------|--------------|
//! | `bool`           | [`BooleanParser`]      | `Bool`     | `True/False` |
//! | `short`          | [`IntegerParser`]      | `Int`      | `Whole #`    |
//! | `int`            | [`IntegerParser`]      | `Int`      | `Whole #`    |
//! | `long`           | [`IntegerParser`]      | `Int`      | `Whole #`    |
//! | `float`          | [`FloatParser`]        | `Float`    | `#`          |
//! | `double`         | [`FloatParser`]        | `Float`    | `#`          |
//! | `string`         | [`StringParser`]       | `String`   | `String`     |
//! | `uuid`           | [`UuidParser`]         | `Uuid`     | `UUID`       |
//! | `datetime`       | [`DateTimeParser`]     | `DateTime` | `Date`       |
//! | `player`         | [`OnlinePlayerParser`] | `Entity`   | `Player`     |
//! | `offline_player` | [`KnownPlayerParser`]  | `Entity`   | `Player`     |

mod boolean;
mod datetime;
mod entity;
mod identifier;
mod numeric;
mod text;

pub use boolean::BooleanParser;
pub use datetime::DateTimeParser;
pub use entity::{KnownPlayerParser, OnlinePlayerParser};
pub use identifier::UuidParser;
pub use numeric::{FloatParser, FloatWidth, IntegerParser, IntegerWidth};
pub use text::StringParser;

/// Registered names of the built-in parameter types.
pub mod names {
    /// `true` / `false`.
    pub const BOOL: &str = "bool";
    /// 16-bit signed integer.
    pub const SHORT: &str = "short";
    /// 32-bit signed integer.
    pub const INT: &str = "int";
    /// 64-bit signed integer.
    pub const LONG: &str = "long";
    /// 32-bit float.
    pub const FLOAT: &str = "float";
    /// 64-bit float.
    pub const DOUBLE: &str = "double";
    /// Any token, verbatim.
    pub const STRING: &str = "string";
    /// Hyphenated UUID.
    pub const UUID: &str = "uuid";
    /// Relative date/time expression such as `30m14h`.
    pub const DATETIME: &str = "datetime";
    /// Connected player.
    pub const PLAYER: &str = "player";
    /// Any player ever seen.
    pub const OFFLINE_PLAYER: &str = "offline_player";
}
