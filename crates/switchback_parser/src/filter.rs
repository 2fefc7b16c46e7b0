//! The filter mini-language.
//!
//! A filter is a comma-separated list of `key:argument` clauses attached to
//! one typed parameter of one command:
//!
//! ```text
//! min:0,max:10          inclusive numeric bounds
//! range:-64to320        inclusive numeric range
//! regex:[a-z_]{3,16}    whole-token pattern match
//! ```
//!
//! Each parser decides which keys it understands; unknown keys are ignored.
//! Clauses are checked in order and the first rejection wins.
//!
//! A `regex:` clause runs to the end of the expression, commas included, so
//! it must be the last clause.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;

/// Why a filter did not accept a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The value is well-formed but outside what the command accepts.
    /// The message is shown to the sender.
    #[error("{0}")]
    Rejected(String),

    /// The filter expression itself is broken. This is an authoring bug,
    /// not a user mistake.
    #[error("malformed filter clause `{clause}`: {reason}")]
    Malformed {
        /// The offending clause.
        clause: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl FilterError {
    /// Creates a rejection with a user-facing reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Creates a malformed-clause error.
    #[must_use]
    pub fn malformed(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            clause: clause.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for authoring errors.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl From<FilterError> for switchback_foundation::Error {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Malformed { clause, reason } => Self::malformed_filter(clause, reason),
            FilterError::Rejected(reason) => Self::internal(format!("filter rejected value: {reason}")),
        }
    }
}

/// One `key:argument` clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clause<'a> {
    /// Clause key, as written.
    pub key: &'a str,
    /// Everything after the first colon.
    pub argument: &'a str,
    /// The full clause text.
    pub text: &'a str,
}

impl Clause<'_> {
    /// Case-insensitive key comparison.
    #[must_use]
    pub fn is(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }
}

/// Splits a filter expression into clauses.
///
/// Blank clauses and clauses without a colon are skipped. A `regex:` clause
/// swallows the rest of the expression.
pub fn clauses(expr: &str) -> impl Iterator<Item = Clause<'_>> {
    let mut rest = Some(expr);
    std::iter::from_fn(move || {
        while let Some(current) = rest.take() {
            let raw = match current.split_once(',') {
                Some((head, tail)) if !is_pattern(head) => {
                    rest = Some(tail);
                    head
                }
                _ => current,
            };
            if let Some(clause) = clause(raw) {
                return Some(clause);
            }
        }
        None
    })
}

fn clause(raw: &str) -> Option<Clause<'_>> {
    let text = raw.trim();
    let (key, argument) = text.split_once(':')?;
    Some(Clause {
        key: key.trim(),
        argument: argument.trim(),
        text,
    })
}

fn is_pattern(raw: &str) -> bool {
    raw.split_once(':')
        .is_some_and(|(key, _)| key.trim().eq_ignore_ascii_case("regex"))
}

// =============================================================================
// Numeric clauses
// =============================================================================

/// A numeric bound understood by the integer and floating parsers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericClause<T> {
    /// Inclusive lower bound.
    Min(T),
    /// Inclusive upper bound.
    Max(T),
    /// Inclusive range.
    Range(T, T),
}

impl<T> NumericClause<T>
where
    T: Copy + PartialOrd + fmt::Display,
{
    /// Checks a value against this clause.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Rejected`] if the value is out of bounds.
    pub fn check(&self, value: T) -> Result<(), FilterError> {
        match *self {
            Self::Min(min) if value < min => Err(FilterError::rejected(format!("Must be greater than {min}."))),
            Self::Max(max) if value > max => Err(FilterError::rejected(format!("Must be less than {max}."))),
            Self::Range(low, high) if value < low || value > high => Err(FilterError::rejected(format!(
                "Must be between {low} and {high}."
            ))),
            _ => Ok(()),
        }
    }
}

fn bound<T: FromStr>(clause: &Clause<'_>, text: &str) -> Result<T, FilterError> {
    text.trim()
        .parse()
        .map_err(|_| FilterError::malformed(clause.text, format!("`{}` is not a valid bound", text.trim())))
}

/// Parses every numeric clause in a filter expression.
///
/// # Errors
///
/// Returns [`FilterError::Malformed`] if a bound does not parse as `T`, a
/// range does not have exactly two bounds, or a range is inverted.
pub fn numeric_clauses<T>(expr: &str) -> Result<Vec<NumericClause<T>>, FilterError>
where
    T: Copy + PartialOrd + FromStr,
{
    let mut parsed = Vec::new();
    for clause in clauses(expr) {
        if clause.is("min") {
            parsed.push(NumericClause::Min(bound(&clause, clause.argument)?));
        } else if clause.is("max") {
            parsed.push(NumericClause::Max(bound(&clause, clause.argument)?));
        } else if clause.is("range") {
            let parts: Vec<&str> = clause.argument.split("to").collect();
            let [low, high] = parts.as_slice() else {
                return Err(FilterError::malformed(clause.text, "expected exactly two bounds"));
            };
            let (low, high): (T, T) = (bound(&clause, low)?, bound(&clause, high)?);
            if low > high {
                return Err(FilterError::malformed(clause.text, "lower bound exceeds upper bound"));
            }
            parsed.push(NumericClause::Range(low, high));
        }
    }
    Ok(parsed)
}

/// Checks a number against every numeric clause of a filter.
///
/// # Errors
///
/// Returns the first rejection, or [`FilterError::Malformed`] if the
/// expression is broken.
pub fn check_numeric<T>(value: T, expr: &str) -> Result<(), FilterError>
where
    T: Copy + PartialOrd + FromStr + fmt::Display,
{
    numeric_clauses::<T>(expr)?
        .iter()
        .try_for_each(|clause| clause.check(value))
}

// =============================================================================
// Pattern clauses
// =============================================================================

/// Compiled `regex:` patterns, keyed by their source text.
///
/// Filters are evaluated on every dispatch, so each distinct pattern is
/// compiled once.
#[derive(Default)]
pub struct PatternCache {
    compiled: Mutex<HashMap<String, Regex>>,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `text` matches `pattern` in full.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Malformed`] if the pattern does not compile.
    pub fn is_match(&self, clause: &Clause<'_>, text: &str) -> Result<bool, FilterError> {
        let mut compiled = self.compiled.lock();
        if let Some(regex) = compiled.get(clause.argument) {
            return Ok(regex.is_match(text));
        }
        let regex = compile(clause)?;
        let matched = regex.is_match(text);
        compiled.insert(clause.argument.to_string(), regex);
        Ok(matched)
    }

    /// Checks text against every `regex:` clause of a filter.
    ///
    /// # Errors
    ///
    /// Returns `Must match P.` for the first pattern that does not match,
    /// or [`FilterError::Malformed`] for a pattern that does not compile.
    pub fn check(&self, text: &str, expr: &str) -> Result<(), FilterError> {
        for clause in clauses(expr).filter(|c| c.is("regex")) {
            if !self.is_match(&clause, text)? {
                return Err(FilterError::rejected(format!("Must match {}.", clause.argument)));
            }
        }
        Ok(())
    }

    /// Number of distinct compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.lock().len()
    }

    /// Returns true if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternCache").field("patterns", &self.len()).finish()
    }
}

fn compile(clause: &Clause<'_>) -> Result<Regex, FilterError> {
    Regex::new(&format!("^(?:{})$", clause.argument))
        .map_err(|err| FilterError::malformed(clause.text, err.to_string()))
}

/// Checks that every `regex:` clause compiles.
///
/// # Errors
///
/// Returns [`FilterError::Malformed`] for the first pattern that does not.
pub fn validate_patterns(expr: &str) -> Result<(), FilterError> {
    clauses(expr)
        .filter(|c| c.is("regex"))
        .try_for_each(|clause| compile(&clause).map(drop))
}
