//! Tab completion.
//!
//! Completion walks the tree with `likely_match` only. It never runs a full
//! parse and filter, so a half-typed command still offers what comes next.

use std::collections::HashSet;
use std::iter;
use std::panic::{self, AssertUnwindSafe};

use switchback_foundation::CommandSender;

use crate::config::RouterConfig;
use crate::handler::panic_message;
use crate::node::{Node, NodeKind, caseless_eq, caseless_starts_with};
use crate::tree::CommandTree;

/// Suggestions for the last of `partial`, the tokens typed after `label`.
///
/// An empty `partial` is read as one empty token.
pub(crate) fn complete(
    tree: &CommandTree,
    config: &RouterConfig,
    sender: &dyn CommandSender,
    label: &str,
    partial: &[&str],
) -> Vec<String> {
    let Some(start) = tree.label(label) else {
        return Vec::new();
    };
    let tokens: &[&str] = if partial.is_empty() { &[""] } else { partial };

    let walk = Walk { sender, config, tokens };
    let mut found = Vec::new();
    walk.gather(start, 0, &mut found);

    let mut seen = HashSet::new();
    found.retain(|s| seen.insert(s.clone()));
    tracing::debug!(label, count = found.len(), "completion");
    found
}

struct Walk<'a> {
    sender: &'a dyn CommandSender,
    config: &'a RouterConfig,
    tokens: &'a [&'a str],
}

impl Walk<'_> {
    fn gather(&self, node: &Node, index: usize, out: &mut Vec<String>) {
        let token = self.tokens[index];
        if index + 1 == self.tokens.len() {
            for next in continuations(node) {
                out.extend(
                    next.suggestions(self.sender)
                        .into_iter()
                        .filter(|s| caseless_starts_with(s, token) || self.config.is_always_shown(s)),
                );
            }
            return;
        }
        for next in continuations(node) {
            if self.likely_match(next, token) {
                self.gather(next, index + 1, out);
            }
        }
    }

    fn likely_match(&self, node: &Node, token: &str) -> bool {
        match &node.kind {
            NodeKind::Root => false,
            NodeKind::Literal(word) => caseless_eq(word, token),
            NodeKind::Typed { ty, filter, .. } => {
                let parser = ty.parser();
                let sender = self.sender;
                panic::catch_unwind(AssertUnwindSafe(|| parser.likely_match(sender, token, filter.as_deref())))
                    .unwrap_or_else(|payload| {
                        tracing::error!(
                            parameter_type = ty.name(),
                            token,
                            panic = panic_message(payload.as_ref()),
                            "parser panicked during completion"
                        );
                        false
                    })
            }
        }
    }
}

/// Nodes that can take the next token: the children, plus the node itself
/// when it is greedy.
fn continuations(node: &Node) -> impl Iterator<Item = &Node> {
    iter::once(node).filter(|n| n.is_greedy()).chain(&node.children)
}
