//! Handlers, their arguments, and invocation timing.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset};
use switchback_foundation::{CommandSender, EntityRef, Error, Result, SenderHandle, Value, ValueType};
use uuid::Uuid;

use crate::spec::{HandlerId, SenderFilter};

/// A command handler.
pub type Handler = Arc<dyn Fn(&CommandContext<'_>) -> Result<()> + Send + Sync>;

/// Wraps a closure as a [`Handler`].
pub fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&CommandContext<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Everything a handler sees about one invocation.
pub struct CommandContext<'a> {
    sender: &'a dyn CommandSender,
    label: &'a str,
    args: &'a Arguments,
}

impl<'a> CommandContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(sender: &'a dyn CommandSender, label: &'a str, args: &'a Arguments) -> Self {
        Self { sender, label, args }
    }

    /// The issuer.
    #[must_use]
    pub fn sender(&self) -> &'a dyn CommandSender {
        self.sender
    }

    /// The command word as typed.
    #[must_use]
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Parsed arguments, in parameter order.
    #[must_use]
    pub fn args(&self) -> &'a Arguments {
        self.args
    }

    /// Sends a line back to the issuer.
    pub fn reply(&self, message: &str) {
        self.sender.send_message(message);
    }
}

/// Parsed arguments in declared parameter order.
///
/// Typed accessors fail with [`ErrorKind::ArgumentType`] or
/// [`ErrorKind::ArgumentMissing`], so handlers can use `?` on them.
///
/// [`ErrorKind::ArgumentType`]: switchback_foundation::ErrorKind::ArgumentType
/// [`ErrorKind::ArgumentMissing`]: switchback_foundation::ErrorKind::ArgumentMissing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Wraps parsed values.
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the command took no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an argument, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterates over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// All arguments as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    fn typed<'v, T>(&'v self, index: usize, expected: ValueType, extract: impl FnOnce(&'v Value) -> Option<T>) -> Result<T> {
        let value = self.get(index).ok_or_else(|| Error::argument_missing(index))?;
        extract(value).ok_or_else(|| Error::argument_type(index, expected, value.value_type()))
    }

    /// Argument as a boolean.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a boolean.
    pub fn boolean(&self, index: usize) -> Result<bool> {
        self.typed(index, ValueType::Bool, Value::as_bool)
    }

    /// Argument as an integer.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not an integer.
    pub fn int(&self, index: usize) -> Result<i64> {
        self.typed(index, ValueType::Int, Value::as_int)
    }

    /// Argument as a float.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a float.
    pub fn float(&self, index: usize) -> Result<f64> {
        self.typed(index, ValueType::Float, Value::as_float)
    }

    /// Argument as text.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a string.
    pub fn string(&self, index: usize) -> Result<&str> {
        self.typed(index, ValueType::String, Value::as_str)
    }

    /// Argument as a UUID.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a UUID.
    pub fn uuid(&self, index: usize) -> Result<Uuid> {
        self.typed(index, ValueType::Uuid, Value::as_uuid)
    }

    /// Argument as a date-time.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a date-time.
    pub fn datetime(&self, index: usize) -> Result<DateTime<FixedOffset>> {
        self.typed(index, ValueType::DateTime, |v| v.as_datetime().copied())
    }

    /// Argument as an entity.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not an entity.
    pub fn entity(&self, index: usize) -> Result<&EntityRef> {
        self.typed(index, ValueType::Entity, Value::as_entity)
    }

    /// Values collected by a greedy parameter.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a list.
    pub fn list(&self, index: usize) -> Result<&[Value]> {
        self.typed(index, ValueType::List, Value::as_list)
    }

    /// Payload of a custom parser.
    ///
    /// # Errors
    ///
    /// Fails if the argument is missing or not a `T`.
    pub fn custom<T: Any>(&self, index: usize) -> Result<&T> {
        self.typed(index, ValueType::Custom, Value::downcast_ref::<T>)
    }
}

// =============================================================================
// Timing
// =============================================================================

/// Invocation statistics for one registration.
#[derive(Debug, Default)]
pub struct Timing {
    invocations: AtomicU64,
    failures: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

/// A point-in-time copy of a [`Timing`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingSnapshot {
    /// Completed invocations.
    pub invocations: u64,
    /// Invocations that returned an error or panicked.
    pub failures: u64,
    /// Time spent in the handler across all invocations.
    pub total: Duration,
    /// Longest single invocation.
    pub max: Duration,
}

impl TimingSnapshot {
    /// Mean invocation time, if the handler ever ran.
    #[must_use]
    pub fn mean(&self) -> Option<Duration> {
        let count = u32::try_from(self.invocations).ok().filter(|n| *n > 0)?;
        Some(self.total / count)
    }
}

impl Timing {
    /// Creates empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one invocation.
    pub fn record(&self, elapsed: Duration, succeeded: bool) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
    }

    /// Copies the current statistics.
    #[must_use]
    pub fn snapshot(&self) -> TimingSnapshot {
        TimingSnapshot {
            invocations: self.invocations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            total: Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed)),
            max: Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed)),
        }
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

/// Locates one path of one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathKey {
    /// The registration.
    pub handler: HandlerId,
    /// Index of the descriptor within the registration.
    pub path: usize,
}

/// The handler bound to a terminal node.
#[derive(Clone)]
pub struct Fulfillment {
    pub(crate) key: PathKey,
    pub(crate) name: Arc<str>,
    pub(crate) handler: Handler,
    pub(crate) permission: Option<Arc<str>>,
    pub(crate) sender: SenderFilter,
    pub(crate) timing: Arc<Timing>,
}

impl Fulfillment {
    /// The registration this fulfillment belongs to.
    #[must_use]
    pub const fn handler_id(&self) -> HandlerId {
        self.key.handler
    }

    /// Which path of the registration reached this node.
    #[must_use]
    pub const fn key(&self) -> PathKey {
        self.key
    }

    /// Handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required permission, if any.
    #[must_use]
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Sender requirement.
    #[must_use]
    pub const fn sender_filter(&self) -> SenderFilter {
        self.sender
    }

    /// Returns true if `sender` passes both the sender-kind and permission
    /// checks.
    #[must_use]
    pub fn permits(&self, sender: &dyn CommandSender) -> bool {
        self.sender.accepts(sender.kind()) && self.permission.as_deref().is_none_or(|p| sender.has_permission(p))
    }

    /// Runs the handler, catching errors and panics.
    ///
    /// Failures are logged and the sender receives `internal_error`.
    /// Returns true if the handler completed successfully.
    pub fn invoke(&self, sender: &SenderHandle, label: &str, args: &Arguments, internal_error: &str) -> bool {
        let span = tracing::info_span!("command", handler = %self.name, id = %self.key.handler, label);
        let _entered = span.enter();

        let context = CommandContext::new(sender.as_ref(), label, args);
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (self.handler)(&context)));
        let elapsed = started.elapsed();

        let succeeded = match outcome {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                match &err.context {
                    Some(origin) => tracing::error!(error = %err, %origin, sender = sender.name(), "command handler failed"),
                    None => tracing::error!(error = %err, sender = sender.name(), "command handler failed"),
                }
                sender.send_message(internal_error);
                false
            }
            Err(payload) => {
                tracing::error!(panic = panic_message(payload.as_ref()), sender = sender.name(), "command handler panicked");
                sender.send_message(internal_error);
                false
            }
        };
        self.timing.record(elapsed, succeeded);
        tracing::debug!(?elapsed, succeeded, "command finished");
        succeeded
    }
}

impl fmt::Debug for Fulfillment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fulfillment")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("permission", &self.permission)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}
