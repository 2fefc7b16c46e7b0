//! The router facade.
//!
//! [`Router`] owns the parser registry, the command tree, and the record of
//! every registration behind one `parking_lot::RwLock`. Registration and
//! removal take the write lock; matching and completion take the read lock
//! and release it before a resolved handler is handed to the primary
//! executor.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use parking_lot::RwLock;
use switchback_foundation::{CommandSender, Error, Result, SenderHandle};
use switchback_parser::{Clock, EntityDirectory, InputTokenizer, ParameterType, Parser, ParserRegistry};

use crate::compile::{CompiledCommand, CompiledPath, TypedSegment, compile_descriptor, compile_spec};
use crate::completion;
use crate::config::RouterConfig;
use crate::dispatch::{self, Resolution};
use crate::executor::{InlineExecutor, InlineWorkers, PrimaryExecutor, WorkerPool};
use crate::handler::{Fulfillment, PathKey, Timing, TimingSnapshot};
use crate::node::caseless_starts_with;
use crate::report::FailureReport;
use crate::spec::{CommandSpec, HandlerId};
use crate::tree::CommandTree;

/// Help metadata for a command word.
///
/// Recorded by the first registration that introduces the word and dropped
/// when the word leaves the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelInfo {
    /// The command word as first registered.
    pub label: String,
    /// Plugin or module that registered it.
    pub owner: Option<String>,
    /// One-line description.
    pub description: Option<String>,
    /// Free-form usage text.
    pub usage: Option<String>,
}

/// What a dispatch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler was handed to the primary executor.
    Handled(HandlerId),
    /// The command word exists but nothing matched. The report has already
    /// been sent to the sender.
    Rejected(FailureReport),
    /// No such command word. The unknown-command message has been sent.
    UnknownCommand,
}

impl DispatchOutcome {
    /// Returns true if a handler was scheduled.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

struct Registration {
    name: Arc<str>,
    params: Vec<TypedSegment>,
    paths: Vec<CompiledPath>,
    active: Vec<bool>,
    timing: Arc<Timing>,
}

struct RouterState {
    registry: ParserRegistry,
    tree: CommandTree,
    registrations: HashMap<HandlerId, Registration>,
    labels: HashMap<String, LabelInfo>,
    next_id: u64,
}

impl RouterState {
    fn new(registry: ParserRegistry) -> Self {
        Self {
            registry,
            tree: CommandTree::new(),
            registrations: HashMap::new(),
            labels: HashMap::new(),
            next_id: 1,
        }
    }

    /// Binds every path of a compiled command.
    ///
    /// A path whose node is already fulfilled by one of `keep` is skipped;
    /// any other existing fulfillment is replaced.
    fn install(&mut self, spec: &CommandSpec, compiled: CompiledCommand, keep: &HashSet<HandlerId>) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;

        let name: Arc<str> = Arc::from(spec.name.as_str());
        let permission: Option<Arc<str>> = spec.permission.as_deref().map(Arc::from);
        let timing = Arc::new(Timing::new());
        let mut active = vec![false; compiled.paths.len()];

        for (index, path) in compiled.paths.iter().enumerate() {
            let holder = self
                .tree
                .find(&path.segments)
                .and_then(|node| node.fulfillment())
                .map(Fulfillment::handler_id);
            if let Some(holder) = holder.filter(|h| keep.contains(h)) {
                tracing::info!(
                    handler = %name,
                    kept = %holder,
                    path = %path.render(),
                    "path already claimed by a higher-priority handler; skipping"
                );
                continue;
            }

            let fulfillment = Fulfillment {
                key: PathKey { handler: id, path: index },
                name: Arc::clone(&name),
                handler: Arc::clone(&spec.handler),
                permission: permission.clone(),
                sender: spec.sender,
                timing: Arc::clone(&timing),
            };
            if let Some(old) = self.tree.add_path(&path.segments, fulfillment) {
                self.deactivate(old.key);
            }
            active[index] = true;

            self.labels
                .entry(path.label().to_lowercase())
                .or_insert_with(|| LabelInfo {
                    label: path.label().to_string(),
                    owner: spec.owner.clone(),
                    description: spec.description.clone(),
                    usage: spec.usage.clone(),
                });
        }

        tracing::info!(
            handler = %name,
            %id,
            paths = active.iter().filter(|a| **a).count(),
            "registered command"
        );
        self.registrations.insert(
            id,
            Registration {
                name,
                params: compiled.params,
                paths: compiled.paths,
                active,
                timing,
            },
        );
        id
    }

    /// Marks a path as no longer bound after another handler took its node.
    fn deactivate(&mut self, key: PathKey) {
        let Some(registration) = self.registrations.get_mut(&key.handler) else {
            return;
        };
        if let Some(flag) = registration.active.get_mut(key.path) {
            *flag = false;
        }
        if !registration.active.iter().any(|a| *a) {
            tracing::info!(handler = %registration.name, id = %key.handler, "every path replaced; dropping registration");
            self.registrations.remove(&key.handler);
        }
    }
}

/// A typed command router.
///
/// `Router` is `Send + Sync`; share it behind an `Arc` to register and
/// dispatch from several threads.
pub struct Router {
    config: RouterConfig,
    state: RwLock<RouterState>,
    primary: Arc<dyn PrimaryExecutor>,
    workers: Arc<dyn WorkerPool>,
}

impl Default for Router {
    fn default() -> Self {
        Self::with_valid_config(RouterConfig::default())
    }
}

impl Router {
    /// Creates a router with the built-in parameter types.
    ///
    /// Handlers run inline on the dispatching thread until a primary
    /// executor is supplied.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: RouterConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RouterState::new(ParserRegistry::with_builtins())),
            primary: Arc::new(InlineExecutor),
            workers: Arc::new(InlineWorkers),
        }
    }

    /// Registers the `player` and `offline_player` types backed by
    /// `directory`.
    #[must_use]
    pub fn with_entity_directory(mut self, directory: Arc<dyn EntityDirectory>) -> Self {
        if !self.state.get_mut().registry.register_entity_parsers(&directory) {
            tracing::warn!("entity parser names already taken; keeping the existing parsers");
        }
        self
    }

    /// Replaces the clock behind the `datetime` type.
    ///
    /// Ignored, with a warning, once any command is registered: compiled
    /// paths already hold the old parser.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let state = self.state.get_mut();
        if state.registrations.is_empty() {
            state.registry.set_clock(clock);
        } else {
            tracing::warn!(
                commands = state.registrations.len(),
                "clock supplied after registration; keeping the current clock"
            );
        }
        self
    }

    /// Sets where resolved handlers run.
    #[must_use]
    pub fn with_primary_executor(mut self, primary: Arc<dyn PrimaryExecutor>) -> Self {
        self.primary = primary;
        self
    }

    /// Sets where asynchronous dispatches are matched.
    #[must_use]
    pub fn with_worker_pool(mut self, workers: Arc<dyn WorkerPool>) -> Self {
        self.workers = workers;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    // =========================================================================
    // Parser registry
    // =========================================================================

    /// Registers a parameter type. The first registration of a name wins.
    pub fn register_parser(&self, name: &str, parser: Arc<dyn Parser>) -> bool {
        self.state.write().registry.register(name, parser)
    }

    /// Looks up a parameter type.
    #[must_use]
    pub fn parser(&self, name: &str) -> Option<ParameterType> {
        self.state.read().registry.lookup(name)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a command.
    ///
    /// Every descriptor is compiled before anything is inserted, so a
    /// failing spec leaves the tree untouched. A path identical to an
    /// existing one replaces the existing handler on that path.
    ///
    /// # Errors
    ///
    /// Fails on an unknown parameter type, a malformed filter, or an
    /// invalid descriptor.
    pub fn register(&self, spec: CommandSpec) -> Result<HandlerId> {
        let mut state = self.state.write();
        let compiled = compile_spec(&spec, &state.registry, &self.config)?;
        Ok(state.install(&spec, compiled, &HashSet::new()))
    }

    /// Registers a batch, highest priority first.
    ///
    /// Within the batch, a higher-priority command keeps any path it shares
    /// with a lower-priority one, and its nodes come first among siblings.
    /// Ids are returned in input order. Nothing is registered if any spec
    /// fails to compile.
    ///
    /// # Errors
    ///
    /// Fails with the first compile error.
    pub fn register_all<I>(&self, specs: I) -> Result<Vec<HandlerId>>
    where
        I: IntoIterator<Item = CommandSpec>,
    {
        let mut specs: Vec<(usize, CommandSpec)> = specs.into_iter().enumerate().collect();
        specs.sort_by_key(|(_, spec)| Reverse(spec.priority));

        let mut state = self.state.write();
        let compiled = specs
            .iter()
            .map(|(_, spec)| compile_spec(spec, &state.registry, &self.config))
            .collect::<Result<Vec<_>>>()?;

        let mut batch = HashSet::new();
        let mut ids: Vec<(usize, HandlerId)> = Vec::with_capacity(specs.len());
        for ((position, spec), compiled) in specs.iter().zip(compiled) {
            let id = state.install(spec, compiled, &batch);
            batch.insert(id);
            ids.push((*position, id));
        }
        ids.sort_by_key(|(position, _)| *position);
        Ok(ids.into_iter().map(|(_, id)| id).collect())
    }

    /// Removes every path a registration still holds, pruning nodes that no
    /// longer lead anywhere.
    ///
    /// # Errors
    ///
    /// Fails if `handler` is not registered.
    pub fn unregister(&self, handler: HandlerId) -> Result<()> {
        let mut state = self.state.write();
        let registration = state
            .registrations
            .remove(&handler)
            .ok_or_else(|| Error::unknown_handler(handler.get()))?;

        for (index, path) in registration.paths.iter().enumerate() {
            if !registration.active[index] {
                continue;
            }
            state
                .tree
                .remove_path(&path.segments, PathKey { handler, path: index }, true);
            if state.tree.label(path.label()).is_none() {
                state.labels.remove(&path.label().to_lowercase());
            }
        }
        tracing::info!(handler = %registration.name, id = %handler, "unregistered command");
        Ok(())
    }

    /// Returns true if `descriptor` is currently bound to `handler`.
    #[must_use]
    pub fn contains(&self, handler: HandlerId, descriptor: &str) -> bool {
        let state = self.state.read();
        let Some(registration) = state.registrations.get(&handler) else {
            return false;
        };
        compile_descriptor(descriptor, &registration.params, &self.config.placeholder)
            .is_ok_and(|segments| state.tree.contains(&segments, handler))
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Matches tokens without running anything.
    pub fn resolve<S: AsRef<str>>(&self, sender: &dyn CommandSender, label: &str, tokens: &[S]) -> Resolution {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let resolution = {
            let state = self.state.read();
            dispatch::resolve(&state.tree, &self.config, sender, label, &tokens)
        };
        match &resolution {
            Resolution::Resolved(command) => {
                tracing::debug!(label, handler = command.name(), "resolved");
            }
            Resolution::Rejected(report) => {
                tracing::debug!(label, depth = report.depth, kind = ?report.kind(), "rejected");
            }
            Resolution::UnknownCommand => tracing::debug!(label, "unknown command"),
        }
        resolution
    }

    /// Matches tokens and schedules the handler on the primary executor.
    ///
    /// On failure the sender is told why.
    pub fn dispatch<S: AsRef<str>>(&self, sender: &SenderHandle, label: &str, tokens: &[S]) -> DispatchOutcome {
        let resolution = self.resolve(sender.as_ref(), label, tokens);
        self.settle(sender, resolution)
    }

    /// Tokenizes a raw line (an optional leading `/` is ignored) and
    /// dispatches it.
    pub fn dispatch_line(&self, sender: &SenderHandle, line: &str) -> DispatchOutcome {
        match InputTokenizer::command_line(line) {
            Some(command) => self.dispatch(sender, &command.label, &command.args),
            None => {
                sender.send_message(&self.config.unknown_command_message);
                DispatchOutcome::UnknownCommand
            }
        }
    }

    /// Matches on the worker pool.
    ///
    /// The receiver yields the outcome once matching is done; the handler
    /// itself still runs on the primary executor.
    pub fn dispatch_async(self: &Arc<Self>, sender: SenderHandle, label: String, tokens: Vec<String>) -> Receiver<DispatchOutcome> {
        let (tx, rx) = mpsc::channel();
        let router = Arc::clone(self);
        self.workers.spawn(Box::new(move || {
            let outcome = router.dispatch(&sender, &label, &tokens);
            // The caller may have stopped listening.
            let _ = tx.send(outcome);
        }));
        rx
    }

    fn settle(&self, sender: &SenderHandle, resolution: Resolution) -> DispatchOutcome {
        match resolution {
            Resolution::Resolved(command) => {
                let id = command.handler_id();
                let sender = Arc::clone(sender);
                let internal_error = self.config.internal_error_message.clone();
                self.primary.execute(Box::new(move || {
                    command
                        .fulfillment
                        .invoke(&sender, &command.label, &command.args, &internal_error);
                }));
                DispatchOutcome::Handled(id)
            }
            Resolution::Rejected(report) => {
                for line in report.lines(&self.config) {
                    sender.send_message(&line);
                }
                DispatchOutcome::Rejected(report)
            }
            Resolution::UnknownCommand => {
                sender.send_message(&self.config.unknown_command_message);
                DispatchOutcome::UnknownCommand
            }
        }
    }

    // =========================================================================
    // Completion
    // =========================================================================

    /// Completions for the last of `partial`, the tokens typed after
    /// `label`.
    pub fn complete<S: AsRef<str>>(&self, sender: &dyn CommandSender, label: &str, partial: &[S]) -> Vec<String> {
        let partial: Vec<&str> = partial.iter().map(AsRef::as_ref).collect();
        let state = self.state.read();
        completion::complete(&state.tree, &self.config, sender, label, &partial)
    }

    /// Completions for a raw partial line.
    ///
    /// While the command word itself is being typed, completes command
    /// words.
    pub fn complete_line(&self, sender: &dyn CommandSender, line: &str) -> Vec<String> {
        if let Some(command) = InputTokenizer::partial_command_line(line) {
            return self.complete(sender, &command.label, &command.args);
        }
        let typed = line.trim_start();
        let typed = typed.strip_prefix('/').unwrap_or(typed);
        self.labels()
            .into_iter()
            .filter(|label| caseless_starts_with(label, typed))
            .collect()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Every bound path, rendered with the command prefix.
    #[must_use]
    pub fn all_commands(&self) -> Vec<String> {
        let state = self.state.read();
        state
            .tree
            .all_commands()
            .into_iter()
            .map(|command| format!("{}{command}", self.config.command_prefix))
            .collect()
    }

    /// Command words in registration order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.state.read().tree.labels()
    }

    /// Help metadata for a command word, ignoring case.
    #[must_use]
    pub fn label_info(&self, label: &str) -> Option<LabelInfo> {
        self.state.read().labels.get(&label.to_lowercase()).cloned()
    }

    /// Number of tree nodes, excluding the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.read().tree.node_count()
    }

    /// Invocation statistics for a registration.
    #[must_use]
    pub fn timings(&self, handler: HandlerId) -> Option<TimingSnapshot> {
        self.state
            .read()
            .registrations
            .get(&handler)
            .map(|registration| registration.timing.snapshot())
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("registrations", &state.registrations.len())
            .field("nodes", &state.tree.node_count())
            .finish_non_exhaustive()
    }
}
