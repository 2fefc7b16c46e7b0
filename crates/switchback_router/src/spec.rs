//! Command registrations as values.
//!
//! A [`CommandSpec`] carries everything the router needs to bind a handler:
//! one or more path descriptors, the ordered parameter list, and the
//! metadata that gates invocation (permission, sender kind).
//!
//! ```
//! use switchback_foundation::SenderKind;
//! use switchback_router::{CommandSpec, ParamSpec, SenderFilter};
//!
//! let spec = CommandSpec::new("msg", |_ctx| Ok(()))
//!     .path("msg <?>")
//!     .path("tell <?>")
//!     .param(ParamSpec::new("player"))
//!     .param(ParamSpec::new("string").greedy())
//!     .permission("chat.msg")
//!     .sender(SenderFilter::Only(SenderKind::Player));
//! assert_eq!(spec.paths().len(), 2);
//! ```

use std::fmt;

use switchback_foundation::{Result, SenderKind};

use crate::handler::{CommandContext, Handler, handler_fn};

/// Identifies one registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(crate) u64);

impl HandlerId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which senders may invoke a command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SenderFilter {
    /// Any sender.
    #[default]
    Any,
    /// Only senders of one kind.
    Only(SenderKind),
}

impl SenderFilter {
    /// Returns true if a sender of `kind` may invoke the command.
    #[must_use]
    pub fn accepts(self, kind: SenderKind) -> bool {
        match self {
            Self::Any => true,
            Self::Only(required) => required == kind,
        }
    }
}

/// One typed parameter of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub(crate) type_name: String,
    pub(crate) filter: Option<String>,
    pub(crate) suggestions: Vec<String>,
    pub(crate) greedy: bool,
}

impl ParamSpec {
    /// A parameter of the named type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            filter: None,
            suggestions: Vec::new(),
            greedy: false,
        }
    }

    /// Attaches a filter expression.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = (!filter.trim().is_empty()).then_some(filter);
        self
    }

    /// Overrides the completions offered for this parameter.
    #[must_use]
    pub fn suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    /// Makes this parameter consume every remaining token.
    ///
    /// Only the last parameter may be greedy. The handler receives a
    /// [`Value::List`](switchback_foundation::Value::List).
    #[must_use]
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// The parameter type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns true if the parameter is greedy.
    #[must_use]
    pub const fn is_greedy(&self) -> bool {
        self.greedy
    }
}

/// A handler and the paths that reach it.
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) paths: Vec<String>,
    pub(crate) params: Vec<ParamSpec>,
    pub(crate) permission: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) usage: Option<String>,
    pub(crate) owner: Option<String>,
    pub(crate) sender: SenderFilter,
    pub(crate) priority: i32,
    pub(crate) handler: Handler,
}

impl CommandSpec {
    /// Creates a spec for a named handler with no paths yet.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self::with_handler(name, handler_fn(handler))
    }

    /// Creates a spec around an existing handler.
    #[must_use]
    pub fn with_handler(name: impl Into<String>, handler: Handler) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
            params: Vec::new(),
            permission: None,
            description: None,
            usage: None,
            owner: None,
            sender: SenderFilter::Any,
            priority: 0,
            handler,
        }
    }

    /// Adds a path descriptor, such as `"chunk preload <?>"`.
    #[must_use]
    pub fn path(mut self, descriptor: impl Into<String>) -> Self {
        self.paths.push(descriptor.into());
        self
    }

    /// Appends a parameter. Parameters bind to placeholders in order.
    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Requires a permission node.
    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        let permission = permission.into();
        self.permission = (!permission.is_empty()).then_some(permission);
        self
    }

    /// Sets the command description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the usage text shown by help listings.
    #[must_use]
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Names the plugin or module that owns the command.
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Restricts which senders may invoke the command.
    #[must_use]
    pub fn sender(mut self, filter: SenderFilter) -> Self {
        self.sender = filter;
        self
    }

    /// Sets the batch registration priority (higher registers first).
    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path descriptors.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Declared parameters.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Batch registration priority.
    #[must_use]
    pub const fn priority_value(&self) -> i32 {
        self.priority
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("paths", &self.paths)
            .field("params", &self.params)
            .field("permission", &self.permission)
            .field("sender", &self.sender)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
