//! Session state for the console host.
//!
//! A session owns the router and plays host to it: matching runs on a
//! dispatch thread, handlers are queued for the session's primary loop, and
//! every line is issued by one sender (the console, or a player chosen with
//! `--as`).

use std::sync::Arc;

use switchback_foundation::{Error, RecordingSender, Result, SenderHandle};
use switchback_parser::{InputTokenizer, MemoryDirectory};
use switchback_router::{DispatchOutcome, PrimaryQueue, Router, RouterConfig, ThreadWorkers};

use crate::config::SessionOptions;
use crate::demo;

/// A router wired to a primary queue, dispatch threads, and a sender.
pub struct Session {
    router: Arc<Router>,
    queue: Arc<PrimaryQueue>,
    directory: Arc<MemoryDirectory>,
    sender: Arc<RecordingSender>,
    handle: SenderHandle,
}

impl Session {
    /// Creates a session with the demo commands registered.
    ///
    /// # Errors
    ///
    /// Fails if the router configuration is invalid or a demo command does
    /// not compile under it.
    pub fn new(config: RouterConfig, options: &SessionOptions) -> Result<Self> {
        let directory = Arc::new(MemoryDirectory::with_online(&options.online));
        let queue = Arc::new(PrimaryQueue::new());
        let router = Arc::new(
            Router::new(config)?
                .with_entity_directory(directory.clone())
                .with_primary_executor(queue.clone())
                .with_worker_pool(Arc::new(ThreadWorkers::new())),
        );
        demo::register(&router, &directory)?;

        let sender = Arc::new(match &options.player {
            Some(name) => {
                let entity = directory.connect(name);
                options
                    .grants
                    .iter()
                    .fold(RecordingSender::player(entity.name()).with_id(entity.id), |sender, grant| {
                        sender.with_permission(grant.as_str())
                    })
            }
            None => RecordingSender::console(),
        });
        let handle: SenderHandle = sender.clone();
        tracing::info!(sender = %handle.name(), kind = %handle.kind(), "session ready");

        Ok(Self {
            router,
            queue,
            directory,
            sender,
            handle,
        })
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Who is online.
    #[must_use]
    pub fn directory(&self) -> &Arc<MemoryDirectory> {
        &self.directory
    }

    /// The sender every line is issued as.
    #[must_use]
    pub fn sender(&self) -> &SenderHandle {
        &self.handle
    }

    /// Runs one line and returns what the router and handlers said.
    ///
    /// Matching runs on a dispatch thread; the resolved handler runs here,
    /// when the primary queue is drained.
    ///
    /// # Errors
    ///
    /// Fails if the dispatch thread dies before reporting an outcome.
    pub fn execute(&self, line: &str) -> Result<Vec<String>> {
        let Some(command) = InputTokenizer::command_line(line) else {
            return Ok(Vec::new());
        };
        let outcome = self
            .router
            .dispatch_async(Arc::clone(&self.handle), command.label, command.args)
            .recv()
            .map_err(|_| Error::internal("dispatch thread exited without an outcome"))?;
        let ran = self.queue.run_pending();
        tracing::debug!(handled = outcome.is_handled(), ran, "line finished");
        if let DispatchOutcome::Rejected(report) = &outcome {
            tracing::debug!(depth = report.depth, kind = ?report.kind(), "line rejected");
        }
        Ok(self.sender.take_messages())
    }

    /// Completions for a partial line.
    #[must_use]
    pub fn complete(&self, line: &str) -> Vec<String> {
        self.router.complete_line(self.handle.as_ref(), line)
    }
}
