//! Switchback - Typed command router for live multi-user servers
//!
//! This crate re-exports all layers of the Switchback system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: switchback_runtime    - Console host, REPL, CLI
//! Layer 2: switchback_router     - Command tree, dispatch, completion
//! Layer 1: switchback_parser     - Parameter types, parsers, filters, tokenizer
//! Layer 0: switchback_foundation - Core types (Value, Error, CommandSender)
//! ```

pub use switchback_foundation as foundation;
pub use switchback_parser as parser;
pub use switchback_router as router;
pub use switchback_runtime as runtime;
