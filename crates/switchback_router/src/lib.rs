//! Command tree, registrar, dispatcher, and completion engine for Switchback.
//!
//! A [`Router`] owns a trie of command paths. Each path starts with a
//! literal command word and continues with literal words and typed
//! parameter slots; a terminal node holds the handler bound to that path.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use switchback_foundation::RecordingSender;
//! use switchback_router::{CommandSpec, ParamSpec, Router};
//!
//! let router = Router::default();
//! router
//!     .register(
//!         CommandSpec::new("chunk_preload", |ctx| {
//!             let radius = ctx.args().int(0)?;
//!             ctx.reply(&format!("Preloading radius {radius}"));
//!             Ok(())
//!         })
//!         .path("chunk preload <?>")
//!         .param(ParamSpec::new("int").filter("min:0")),
//!     )
//!     .unwrap();
//!
//! let sender = Arc::new(RecordingSender::console());
//! let handle: switchback_foundation::SenderHandle = sender.clone();
//! assert!(router.dispatch(&handle, "chunk", &["preload", "16"]).is_handled());
//! assert_eq!(sender.messages(), vec!["Preloading radius 16"]);
//! ```
//!
//! # Modules
//!
//! - [`router`] - The [`Router`] facade and its lock
//! - [`spec`] - Command registrations as values ([`CommandSpec`], [`ParamSpec`])
//! - [`compile`] - Descriptor compilation into path segments
//! - [`node`] - Tree vertices and their identity rules
//! - [`tree`] - Insertion, replacement, removal, and pruning
//! - [`dispatch`] - Backtracking matcher
//! - [`report`] - Ranked failure reports
//! - [`completion`] - Prefix completion over the same tree
//! - [`handler`] - Handlers, their arguments, and invocation timing
//! - [`executor`] - Primary-thread executors and worker pools
//! - [`config`] - Router configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compile;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod executor;
pub mod handler;
pub mod node;
pub mod report;
pub mod router;
pub mod spec;
pub mod tree;

// Re-export main types for convenience
pub use config::RouterConfig;
pub use dispatch::{Resolution, ResolvedCommand};
pub use executor::{InlineExecutor, InlineWorkers, Job, PrimaryExecutor, PrimaryQueue, ThreadWorkers, WorkerPool};
pub use handler::{Arguments, CommandContext, Handler, Timing, TimingSnapshot, handler_fn};
pub use report::{FailureGroup, FailureKind, FailureReport};
pub use router::{DispatchOutcome, LabelInfo, Router};
pub use spec::{CommandSpec, HandlerId, ParamSpec, SenderFilter};
