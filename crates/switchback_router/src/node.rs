//! Tree vertices.
//!
//! A node is either the root, a literal word, or a typed slot. Siblings
//! never share an identity:
//!
//! - literal vs literal: equal ignoring case;
//! - typed vs typed: same parameter type, same greediness, and filters that
//!   are both absent or equal ignoring case.

use std::fmt;

use switchback_foundation::CommandSender;
use switchback_parser::ParameterType;

use crate::compile::{PathSegment, render_slot};
use crate::handler::{Fulfillment, PathKey};

/// Case-insensitive string equality (Unicode lowercase folding).
#[must_use]
pub fn caseless_eq(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive prefix test.
#[must_use]
pub fn caseless_starts_with(text: &str, prefix: &str) -> bool {
    let mut text = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| text.next() == Some(p))
}

/// What a node matches.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// The tree root. Its children are command words.
    Root,
    /// A literal word, as first registered.
    Literal(String),
    /// A typed slot.
    Typed {
        /// Parameter type.
        ty: ParameterType,
        /// Filter expression, if any.
        filter: Option<String>,
        /// Whether the slot consumes every remaining token.
        greedy: bool,
    },
}

/// A completion contributed by one registration path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionOverride {
    /// The path that contributed it.
    pub source: PathKey,
    /// The completion text.
    pub text: String,
}

/// A vertex of the command tree.
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) children: Vec<Node>,
    pub(crate) fulfillment: Option<Fulfillment>,
    pub(crate) overrides: Vec<SuggestionOverride>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            fulfillment: None,
            overrides: Vec::new(),
        }
    }

    pub(crate) fn from_segment(segment: &PathSegment) -> Self {
        Self::new(match segment {
            PathSegment::Literal(word) => NodeKind::Literal(word.clone()),
            PathSegment::Typed(slot) => NodeKind::Typed {
                ty: slot.ty.clone(),
                filter: slot.filter.clone(),
                greedy: slot.greedy,
            },
        })
    }

    /// What this node matches.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Children in registration order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The bound handler, if this node ends a path.
    #[must_use]
    pub fn fulfillment(&self) -> Option<&Fulfillment> {
        self.fulfillment.as_ref()
    }

    /// Completion overrides, in registration order.
    #[must_use]
    pub fn overrides(&self) -> &[SuggestionOverride] {
        &self.overrides
    }

    /// Returns true for a greedy typed slot.
    #[must_use]
    pub fn is_greedy(&self) -> bool {
        matches!(self.kind, NodeKind::Typed { greedy: true, .. })
    }

    /// Returns true if the node neither ends a path nor leads anywhere.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.children.is_empty() && self.fulfillment.is_none()
    }

    /// Returns true if this node has the identity of `segment`.
    #[must_use]
    pub fn matches_segment(&self, segment: &PathSegment) -> bool {
        match (&self.kind, segment) {
            (NodeKind::Literal(word), PathSegment::Literal(other)) => caseless_eq(word, other),
            (NodeKind::Typed { ty, filter, greedy }, PathSegment::Typed(slot)) => {
                slot.same_slot(ty, filter.as_deref(), *greedy)
            }
            _ => false,
        }
    }

    pub(crate) fn child_index(&self, segment: &PathSegment) -> Option<usize> {
        self.children.iter().position(|child| child.matches_segment(segment))
    }

    /// Finds a literal child ignoring case.
    #[must_use]
    pub fn literal_child(&self, word: &str) -> Option<&Node> {
        self.children
            .iter()
            .find(|child| matches!(&child.kind, NodeKind::Literal(w) if caseless_eq(w, word)))
    }

    /// Renders the node as it appears in usage lines.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.kind {
            NodeKind::Root => String::new(),
            NodeKind::Literal(word) => word.clone(),
            NodeKind::Typed { ty, greedy, .. } => render_slot(ty, *greedy),
        }
    }

    /// Every fulfilled path at or below this node, rendered from this node
    /// down, in registration order.
    #[must_use]
    pub fn possible_commands(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut prefix = Vec::new();
        self.collect_commands(&mut prefix, &mut out);
        out
    }

    fn collect_commands(&self, prefix: &mut Vec<String>, out: &mut Vec<String>) {
        let pushed = !matches!(self.kind, NodeKind::Root);
        if pushed {
            prefix.push(self.render());
        }
        if self.fulfillment.is_some() {
            out.push(prefix.join(" "));
        }
        for child in &self.children {
            child.collect_commands(prefix, out);
        }
        if pushed {
            prefix.pop();
        }
    }

    /// Completions this node offers when it is the next position.
    ///
    /// Literals offer their word. Typed slots offer their overrides, else
    /// their parser's defaults, else a rendered `<Type>` placeholder.
    #[must_use]
    pub fn suggestions(&self, sender: &dyn CommandSender) -> Vec<String> {
        match &self.kind {
            NodeKind::Root => Vec::new(),
            NodeKind::Literal(word) => vec![word.clone()],
            NodeKind::Typed { ty, greedy, .. } => {
                if !self.overrides.is_empty() {
                    return self.overrides.iter().map(|o| o.text.clone()).collect();
                }
                ty.parser()
                    .default_suggestions(sender)
                    .unwrap_or_else(|| vec![render_slot(ty, *greedy)])
            }
        }
    }

    /// Number of nodes in this subtree, excluding this one.
    #[must_use]
    pub fn descendants(&self) -> usize {
        self.children.iter().map(|child| 1 + child.descendants()).sum()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &self.kind {
            NodeKind::Root => "(root)".to_string(),
            NodeKind::Typed {
                filter: Some(filter), ..
            } => format!("{} [{filter}]", self.render()),
            _ => self.render(),
        };
        f.debug_struct("Node")
            .field("kind", &label)
            .field("fulfillment", &self.fulfillment)
            .field("children", &self.children)
            .finish()
    }
}
