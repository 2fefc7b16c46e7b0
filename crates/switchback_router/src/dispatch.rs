//! Backtracking matcher.
//!
//! The search starts at the command word's node and consumes one token per
//! level (a greedy slot consumes the rest). Children are tried in
//! registration order; the first branch that reaches a permitted handler
//! wins. Every branch that dies leaves a [`Candidate`] behind so a failed
//! search can explain itself.

use std::panic::{self, AssertUnwindSafe};

use switchback_foundation::{CommandSender, Value};
use switchback_parser::{FilterError, ParameterType};

use crate::config::RouterConfig;
use crate::handler::{Arguments, Fulfillment, panic_message};
use crate::node::{Node, NodeKind, caseless_eq};
use crate::report::{Candidate, FailureKind, FailureReport};
use crate::spec::HandlerId;
use crate::tree::CommandTree;

/// A handler chosen by the matcher, with its parsed arguments.
#[derive(Clone, Debug)]
pub struct ResolvedCommand {
    pub(crate) fulfillment: Fulfillment,
    pub(crate) label: String,
    pub(crate) args: Arguments,
}

impl ResolvedCommand {
    /// The registration that will run.
    #[must_use]
    pub const fn handler_id(&self) -> HandlerId {
        self.fulfillment.key.handler
    }

    /// Handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.fulfillment.name()
    }

    /// Command word as typed.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parsed arguments.
    #[must_use]
    pub fn args(&self) -> &Arguments {
        &self.args
    }
}

/// Result of matching without invoking.
#[derive(Clone, Debug)]
pub enum Resolution {
    /// A handler matched and the sender may run it.
    Resolved(ResolvedCommand),
    /// The command word exists but nothing matched.
    Rejected(FailureReport),
    /// No such command word.
    UnknownCommand,
}

impl Resolution {
    /// Returns the resolved command, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedCommand> {
        match self {
            Self::Resolved(command) => Some(command),
            _ => None,
        }
    }

    /// Returns the failure report, if any.
    #[must_use]
    pub fn report(&self) -> Option<&FailureReport> {
        match self {
            Self::Rejected(report) => Some(report),
            _ => None,
        }
    }
}

type Rejection = (FailureKind, String);

/// Matches tokens under a command word.
pub(crate) fn resolve(
    tree: &CommandTree,
    config: &RouterConfig,
    sender: &dyn CommandSender,
    label: &str,
    tokens: &[&str],
) -> Resolution {
    let Some(start) = tree.label(label) else {
        return Resolution::UnknownCommand;
    };

    let mut search = Search {
        sender,
        config,
        tokens,
        path: vec![start],
        values: Vec::new(),
        candidates: Vec::new(),
    };
    match search.run(start, 0) {
        Some(fulfillment) => Resolution::Resolved(ResolvedCommand {
            fulfillment: fulfillment.clone(),
            label: label.to_string(),
            args: Arguments::new(search.values),
        }),
        None => Resolution::Rejected(FailureReport::from_candidates(search.candidates, config)),
    }
}

struct Search<'t, 'a> {
    sender: &'a dyn CommandSender,
    config: &'a RouterConfig,
    tokens: &'a [&'a str],
    path: Vec<&'t Node>,
    values: Vec<Value>,
    candidates: Vec<Candidate<'t>>,
}

impl<'t> Search<'t, '_> {
    fn run(&mut self, node: &'t Node, depth: usize) -> Option<&'t Fulfillment> {
        if depth == self.tokens.len() {
            return self.finish(node, depth);
        }

        // The leftover token counts toward depth, so this ties with the
        // children's own mismatches and loses to them on rank.
        if node.fulfillment.is_some() {
            self.fail(depth + 1, FailureKind::TooManyArguments, "Too many arguments.".to_string());
        }

        for child in &node.children {
            self.path.push(child);
            match self.accept(child, depth) {
                Ok((value, consumed)) => {
                    let mark = self.values.len();
                    self.values.extend(value);
                    if let Some(found) = self.run(child, depth + consumed) {
                        return Some(found);
                    }
                    self.values.truncate(mark);
                }
                Err((at, (kind, reason))) => self.fail(at, kind, reason),
            }
            self.path.pop();
        }
        None
    }

    fn finish(&mut self, node: &'t Node, depth: usize) -> Option<&'t Fulfillment> {
        let Some(fulfillment) = node.fulfillment() else {
            self.fail(depth, FailureKind::NotEnoughArguments, "Not enough arguments.".to_string());
            return None;
        };
        let kind = self.sender.kind();
        if !fulfillment.sender.accepts(kind) {
            self.fail(depth, FailureKind::SenderMismatch, format!("Cannot be run by a {kind}."));
            return None;
        }
        if let Some(permission) = fulfillment.permission()
            && !self.sender.has_permission(permission)
        {
            self.fail(depth, FailureKind::PermissionDenied, "No permission.".to_string());
            return None;
        }
        Some(fulfillment)
    }

    /// Matches one child against the input at `depth`.
    ///
    /// Returns the parsed value (none for literals) and how many tokens it
    /// consumed, or the depth and reason of the failure.
    fn accept(&self, child: &Node, depth: usize) -> Result<(Option<Value>, usize), (usize, Rejection)> {
        let token = self.tokens[depth];
        match &child.kind {
            NodeKind::Literal(word) if caseless_eq(word, token) => Ok((None, 1)),
            NodeKind::Root | NodeKind::Literal(_) => {
                Err((depth + 1, (FailureKind::NoMatch, "No match.".to_string())))
            }
            NodeKind::Typed {
                ty,
                filter,
                greedy: false,
            } => self
                .parse(ty, filter.as_deref(), token)
                .map(|value| (Some(value), 1))
                .map_err(|rejection| (depth + 1, rejection)),
            NodeKind::Typed {
                ty,
                filter,
                greedy: true,
            } => {
                let rest = &self.tokens[depth..];
                let mut items = Vec::with_capacity(rest.len());
                for (offset, token) in rest.iter().enumerate() {
                    let value = self
                        .parse(ty, filter.as_deref(), token)
                        .map_err(|rejection| (depth + offset + 1, rejection))?;
                    items.push(value);
                }
                Ok((Some(Value::from(items)), rest.len()))
            }
        }
    }

    fn parse(&self, ty: &ParameterType, filter: Option<&str>, token: &str) -> Result<Value, Rejection> {
        let parser = ty.parser();
        let sender = self.sender;
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Value, Option<FilterError>> {
            let value = parser.parse(sender, token).ok_or(None)?;
            if let Some(expr) = filter {
                parser.filter(sender, &value, expr).map_err(Some)?;
            }
            Ok(value)
        }));

        match attempt {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(None)) => Err((FailureKind::NotParsed, format!("Not a {}.", ty.display_name()))),
            Ok(Err(Some(FilterError::Rejected(reason)))) => Err((FailureKind::FilterRejected, reason)),
            Ok(Err(Some(err @ FilterError::Malformed { .. }))) => {
                tracing::error!(parameter_type = ty.name(), error = %err, "malformed filter reached dispatch");
                Err((FailureKind::Internal, self.config.internal_error_message.clone()))
            }
            Err(payload) => {
                tracing::error!(
                    parameter_type = ty.name(),
                    token,
                    panic = panic_message(payload.as_ref()),
                    "parser panicked"
                );
                Err((FailureKind::Internal, self.config.internal_error_message.clone()))
            }
        }
    }

    fn fail(&mut self, depth: usize, kind: FailureKind, reason: String) {
        self.candidates.push(Candidate {
            path: self.path.clone(),
            depth,
            kind,
            reason,
        });
    }
}
