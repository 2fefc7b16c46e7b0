use switchback_foundation::{CommandSender, Value};

use crate::filter::{self, FilterError};
use crate::parser::Parser;

/// Storage width of an integer parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegerWidth {
    /// `i16`
    Short,
    /// `i32`
    Int,
    /// `i64`
    Long,
}

/// Parses base-10 signed integers of a given width into [`Value::Int`].
///
/// Understands `min:`, `max:` and `range:` filters. Bounds must fit the
/// width, so `max:40000` on a `short` is malformed.
#[derive(Clone, Copy, Debug)]
pub struct IntegerParser {
    width: IntegerWidth,
}

impl IntegerParser {
    /// Creates a parser for the given width.
    #[must_use]
    pub const fn new(width: IntegerWidth) -> Self {
        Self { width }
    }

    /// Returns the width.
    #[must_use]
    pub const fn width(&self) -> IntegerWidth {
        self.width
    }

    fn narrow<T: TryFrom<i64>>(value: i64) -> Result<T, FilterError> {
        T::try_from(value).map_err(|_| FilterError::rejected(format!("{value} is out of range.")))
    }
}

impl Parser for IntegerParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        let parsed = match self.width {
            IntegerWidth::Short => token.parse::<i16>().ok().map(i64::from),
            IntegerWidth::Int => token.parse::<i32>().ok().map(i64::from),
            IntegerWidth::Long => token.parse::<i64>().ok(),
        };
        parsed.map(Value::Int)
    }

    fn filter(&self, _sender: &dyn CommandSender, value: &Value, expr: &str) -> Result<(), FilterError> {
        let Some(n) = value.as_int() else {
            return Ok(());
        };
        match self.width {
            IntegerWidth::Short => filter::check_numeric(Self::narrow::<i16>(n)?, expr),
            IntegerWidth::Int => filter::check_numeric(Self::narrow::<i32>(n)?, expr),
            IntegerWidth::Long => filter::check_numeric(n, expr),
        }
    }

    fn validate_filter(&self, expr: &str) -> Result<(), FilterError> {
        match self.width {
            IntegerWidth::Short => filter::numeric_clauses::<i16>(expr).map(drop),
            IntegerWidth::Int => filter::numeric_clauses::<i32>(expr).map(drop),
            IntegerWidth::Long => filter::numeric_clauses::<i64>(expr).map(drop),
        }
    }

    fn display_name(&self) -> Option<&str> {
        Some("Whole #")
    }
}

/// Storage width of a floating-point parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatWidth {
    /// `f32`
    Float,
    /// `f64`
    Double,
}

/// Parses finite decimal numbers into [`Value::Float`].
///
/// `NaN` and infinities are rejected.
#[derive(Clone, Copy, Debug)]
pub struct FloatParser {
    width: FloatWidth,
}

impl FloatParser {
    /// Creates a parser for the given width.
    #[must_use]
    pub const fn new(width: FloatWidth) -> Self {
        Self { width }
    }

    /// Returns the width.
    #[must_use]
    pub const fn width(&self) -> FloatWidth {
        self.width
    }
}

impl Parser for FloatParser {
    fn parse(&self, _sender: &dyn CommandSender, token: &str) -> Option<Value> {
        let parsed = match self.width {
            FloatWidth::Float => token.parse::<f32>().ok().map(f64::from),
            FloatWidth::Double => token.parse::<f64>().ok(),
        };
        parsed.filter(|n| n.is_finite()).map(Value::Float)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn filter(&self, _sender: &dyn CommandSender, value: &Value, expr: &str) -> Result<(), FilterError> {
        let Some(n) = value.as_float() else {
            return Ok(());
        };
        match self.width {
            FloatWidth::Float => filter::check_numeric(n as f32, expr),
            FloatWidth::Double => filter::check_numeric(n, expr),
        }
    }

    fn validate_filter(&self, expr: &str) -> Result<(), FilterError> {
        match self.width {
            FloatWidth::Float => filter::numeric_clauses::<f32>(expr).map(drop),
            FloatWidth::Double => filter::numeric_clauses::<f64>(expr).map(drop),
        }
    }

    fn display_name(&self) -> Option<&str> {
        Some("#")
    }
}
