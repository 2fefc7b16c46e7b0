//! Core values, entity references, sender capabilities, and errors for Switchback.
//!
//! This crate provides:
//! - [`Value`] - A parsed command argument
//! - [`EntityRef`] - A handle to a connected or known entity (player)
//! - [`ValueType`] - Descriptors used when reporting argument mismatches
//! - [`CommandSender`] - The capability a host hands to the router for each invocation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod sender;
pub mod types;
pub mod value;

pub use entity::EntityRef;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use sender::{CommandSender, RecordingSender, SenderHandle, SenderKind};
pub use types::ValueType;
pub use value::Value;
