//! Parameter types, argument parsers, filters, and tokenization for Switchback.
//!
//! This crate turns single input tokens into typed [`Value`]s.
//!
//! # Architecture
//!
//! ```text
//! "/chunk preload 16"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   TOKENIZER     │  → label "chunk", args ["preload", "16"]
//! └─────────────────┘
//!          │           (the router walks its tree; at a typed slot…)
//!          ▼
//! ┌─────────────────┐
//! │ PARSER REGISTRY │  → ParameterType "int" → IntegerParser
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PARSE + FILTER  │  → Value::Int(16), "min:0" passes
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`parser`] - The [`Parser`] plugin trait and [`ParameterType`]
//! - [`registry`] - First-registration-wins map from type name to parser
//! - [`filter`] - The comma-separated filter mini-language
//! - [`builtin`] - Parsers for booleans, numbers, strings, UUIDs, dates, and entities
//! - [`capability`] - Host capabilities parsers call through (entity directory, clock)
//! - [`tokenizer`] - Whitespace tokenization of raw command lines
//!
//! [`Value`]: switchback_foundation::Value

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod capability;
pub mod filter;
pub mod parser;
pub mod registry;
pub mod tokenizer;

// Re-export main types for convenience
pub use builtin::names;
pub use capability::{Clock, EntityDirectory, FixedClock, MemoryDirectory, SystemClock};
pub use filter::FilterError;
pub use parser::{ParameterType, Parser};
pub use registry::ParserRegistry;
pub use tokenizer::{CommandLine, InputTokenizer};
