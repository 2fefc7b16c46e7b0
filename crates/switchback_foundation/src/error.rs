//! Error types for the Switchback system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! These are *operator* errors: broken registrations, misbehaving handlers,
//! bad configuration. Ordinary user-input rejections during dispatch are not
//! errors; the router turns them into a failure report for the sender.

use std::fmt;

use thiserror::Error;

use crate::types::ValueType;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Switchback operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an argument type mismatch error.
    #[must_use]
    pub fn argument_type(index: usize, expected: ValueType, actual: ValueType) -> Self {
        Self::new(ErrorKind::ArgumentType {
            index,
            expected,
            actual,
        })
    }

    /// Creates a missing argument error.
    #[must_use]
    pub fn argument_missing(index: usize) -> Self {
        Self::new(ErrorKind::ArgumentMissing(index))
    }

    /// Creates an unknown parameter type error.
    #[must_use]
    pub fn unknown_parameter_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownParameterType(name.into()))
    }

    /// Creates an invalid descriptor error.
    #[must_use]
    pub fn invalid_descriptor(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDescriptor {
            descriptor: descriptor.into(),
            reason: reason.into(),
        })
    }

    /// Creates an arity mismatch error.
    #[must_use]
    pub fn arity_mismatch(placeholders: usize, parameters: usize) -> Self {
        Self::new(ErrorKind::ArityMismatch {
            placeholders,
            parameters,
        })
    }

    /// Creates a malformed filter error.
    #[must_use]
    pub fn malformed_filter(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedFilter {
            clause: clause.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unknown handler error.
    #[must_use]
    pub fn unknown_handler(id: u64) -> Self {
        Self::new(ErrorKind::UnknownHandler(id))
    }

    /// Creates a handler failure. Handlers return this to signal that a
    /// command could not complete.
    #[must_use]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Handler(message.into()))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A handler asked for an argument as the wrong type.
    #[error("argument {index}: expected {expected}, got {actual}")]
    ArgumentType {
        /// Position of the argument (0-based, sender excluded).
        index: usize,
        /// The type the handler asked for.
        expected: ValueType,
        /// The type the router parsed.
        actual: ValueType,
    },

    /// A handler asked for an argument past the end of the list.
    #[error("argument {0} is missing")]
    ArgumentMissing(usize),

    /// A parameter names a type with no registered parser.
    #[error("no parser registered for parameter type `{0}`")]
    UnknownParameterType(String),

    /// A path descriptor breaks the descriptor grammar.
    #[error("invalid descriptor `{descriptor}`: {reason}")]
    InvalidDescriptor {
        /// The offending descriptor.
        descriptor: String,
        /// What is wrong with it.
        reason: String,
    },

    /// More placeholders than declared parameters.
    #[error("descriptor has {placeholders} placeholders but the handler declares {parameters} parameters")]
    ArityMismatch {
        /// Placeholders in the descriptor.
        placeholders: usize,
        /// Parameters declared by the handler.
        parameters: usize,
    },

    /// A filter expression cannot be understood by its parser.
    #[error("malformed filter clause `{clause}`: {reason}")]
    MalformedFilter {
        /// The clause that failed.
        clause: String,
        /// Why it failed.
        reason: String,
    },

    /// No registration exists for the handler id.
    #[error("unknown handler #{0}")]
    UnknownHandler(u64),

    /// A command handler reported failure.
    #[error("handler failed: {0}")]
    Handler(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Command word or handler name.
    pub source: Option<String>,
    /// Descriptor being processed.
    pub descriptor: Option<String>,
    /// Stack of operations that led here.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            descriptor: None,
            stack: Vec::new(),
        }
    }

    /// Sets the source (command word or handler name).
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the descriptor being processed.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(descriptor.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(descriptor) = &self.descriptor {
                write!(f, " (\"{descriptor}\")")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  while {frame}")?;
            }
        }
        Ok(())
    }
}
