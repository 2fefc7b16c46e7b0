use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};
use switchback_foundation::{CommandSender, Value};

use crate::capability::Clock;
use crate::parser::Parser;

/// Parses a compact date expression relative to "now".
///
/// The token is a run of `<digits><unit>` groups. Each group overrides one
/// field of the clock's current time:
///
/// | Unit | Field  | Range |
/// |------|--------|-------|
/// | `s`  | second | 0-59  |
/// | `m`  | minute | 0-59  |
/// | `h`  | hour   | 0-23  |
/// | `d`  | day    | 1-31  |
/// | `mo` | month  | 1-12  |
/// | `y`  | year   | any   |
///
/// `0s30m14h` is 14:30:00 today; `25d12mo2030y` is Christmas 2030 at the
/// current time of day. Dates that do not exist (`31d2mo`) fail to parse.
pub struct DateTimeParser {
    clock: Arc<dyn Clock>,
}

#[derive(Clone, Copy)]
struct Fields {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Fields {
    fn of(at: &DateTime<FixedOffset>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
            day: at.day(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
        }
    }

    fn set(&mut self, unit: &str, n: u64) -> Option<()> {
        let small = |min: u32, max: u32| u32::try_from(n).ok().filter(|v| (min..=max).contains(v));
        match unit {
            "s" => self.second = small(0, 59)?,
            "m" => self.minute = small(0, 59)?,
            "h" => self.hour = small(0, 23)?,
            "d" => self.day = small(1, 31)?,
            "mo" => self.month = small(1, 12)?,
            "y" => self.year = i32::try_from(n).ok()?,
            _ => return None,
        }
        Some(())
    }
}

impl DateTimeParser {
    /// Creates a parser reading "now" from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Parses an expression against an explicit "now".
    #[must_use]
    pub fn parse_at(now: &DateTime<FixedOffset>, token: &str) -> Option<DateTime<FixedOffset>> {
        if token.is_empty() {
            return None;
        }
        let lower = token.to_ascii_lowercase();
        let mut fields = Fields::of(now);
        let mut rest = lower.as_str();
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 || digits == rest.len() {
                return None;
            }
            let n: u64 = rest[..digits].parse().ok()?;
            rest = &rest[digits..];
            let unit_len = if rest.starts_with("mo") { 2 } else { 1 };
            fields.set(rest.get(..unit_len)?, n)?;
            rest = rest.get(unit_len..)?;
        }
        now.timezone()
            .with_ymd_and_hms(
                fields.year,
                fields.month,
                fields.day,
                fields.hour,
                fields.minute,
                fields.second,
            )
            .single()
    }

    /// Renders a time in the expression format, e.g. `5s30m14h17d5mo2024y`.
    #[must_use]
    pub fn render(at: &DateTime<FixedOffset>) -> String {
        format!(
            "{}s{}m{}h{}d{}mo{}y",
            at.second(),
            at.minute(),
            at.hour(),
            at.day(),
            at.month(),
            at.year()
        )
    }
}

impl Parser for DateTimeParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        Self::parse_at(&self.clock.now(), token).map(Value::DateTime)
    }

    fn default_suggestions(&self, _sender: &dyn CommandSender) -> Option<Vec<String>> {
        Some(vec![Self::render(&self.clock.now())])
    }

    fn display_name(&self) -> Option<&str> {
        Some("Date")
    }
}

impl fmt::Debug for DateTimeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeParser").finish_non_exhaustive()
    }
}
