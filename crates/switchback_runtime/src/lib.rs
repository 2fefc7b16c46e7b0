//! Interactive console host and CLI for Switchback.
//!
//! This crate provides:
//! - [`Session`] - A router wired to a primary queue, dispatch threads, and a sender
//! - [`Repl`] - Interactive loop with tab completion backed by the router
//! - [`HostConfig`] - TOML configuration for the router and the session
//! - [`demo`] - A small command set registered through the public API

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod demo;
pub mod editor;
pub mod repl;
pub mod session;

pub use config::{HostConfig, SessionOptions};
pub use editor::{CommandCompleter, LineEditor, ReadResult, RustylineEditor};
pub use repl::{Repl, run_batch};
pub use session::Session;
