//! The command tree.
//!
//! Paths are inserted lazily, one node per segment. Identical paths share
//! nodes, so re-registering a path reuses the structure and only swaps the
//! terminal fulfillment. Removal can prune nodes that no longer lead to a
//! handler, walking upward from the leaf and stopping at the first node
//! still in use.

use crate::compile::PathSegment;
use crate::handler::{Fulfillment, PathKey};
use crate::node::{Node, SuggestionOverride};
use crate::spec::HandlerId;

/// A trie of command paths.
#[derive(Debug)]
pub struct CommandTree {
    root: Node,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { root: Node::root() }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Finds a command word ignoring case.
    #[must_use]
    pub fn label(&self, word: &str) -> Option<&Node> {
        self.root.literal_child(word)
    }

    /// Every command word, in registration order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.root.children.iter().map(Node::render).collect()
    }

    /// Number of nodes, excluding the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.descendants()
    }

    /// Every fulfilled path, rendered.
    #[must_use]
    pub fn all_commands(&self) -> Vec<String> {
        self.root.possible_commands()
    }

    /// Follows a path without creating anything.
    #[must_use]
    pub fn find(&self, segments: &[PathSegment]) -> Option<&Node> {
        segments.iter().try_fold(&self.root, |node, segment| {
            node.child_index(segment).map(|index| &node.children[index])
        })
    }

    /// Returns true if the path ends at a node fulfilled by `handler`.
    #[must_use]
    pub fn contains(&self, segments: &[PathSegment], handler: HandlerId) -> bool {
        self.find(segments)
            .and_then(Node::fulfillment)
            .is_some_and(|f| f.handler_id() == handler)
    }

    /// Inserts a path and binds its terminal node.
    ///
    /// If the node was already fulfilled, the previous fulfillment is
    /// detached and returned, and the suggestion overrides its registration
    /// contributed along this path are removed.
    pub fn add_path(&mut self, segments: &[PathSegment], fulfillment: Fulfillment) -> Option<Fulfillment> {
        let key = fulfillment.key;
        let replaced = self.ensure_path(segments).fulfillment.replace(fulfillment);

        if let Some(old) = &replaced {
            tracing::info!(
                replaced = %old.name,
                replaced_id = %old.handler_id(),
                id = %key.handler,
                "path already fulfilled; replacing the previous handler"
            );
            self.visit_path_mut(segments, |_, node| node.overrides.retain(|o| o.source != old.key));
        }

        self.visit_path_mut(segments, |segment, node| {
            if let PathSegment::Typed(slot) = segment {
                node.overrides.extend(slot.suggestions.iter().map(|text| SuggestionOverride {
                    source: key,
                    text: text.clone(),
                }));
            }
        });
        replaced
    }

    /// Removes one path of a registration.
    ///
    /// The terminal fulfillment is cleared only if it belongs to
    /// `key.handler`. Suggestion overrides contributed by `key` are removed
    /// along the path. With `prune`, nodes left with no children and no
    /// fulfillment are deleted. Returns true if a fulfillment was cleared.
    pub fn remove_path(&mut self, segments: &[PathSegment], key: PathKey, prune: bool) -> bool {
        Self::remove_below(&mut self.root, segments, key, prune).unwrap_or(false)
    }

    fn remove_below(node: &mut Node, segments: &[PathSegment], key: PathKey, prune: bool) -> Option<bool> {
        let Some((segment, rest)) = segments.split_first() else {
            let owned = node
                .fulfillment
                .as_ref()
                .is_some_and(|f| f.handler_id() == key.handler);
            if owned {
                node.fulfillment = None;
            }
            return Some(owned);
        };

        let index = node.child_index(segment)?;
        let child = &mut node.children[index];
        child.overrides.retain(|o| o.source != key);
        let removed = Self::remove_below(child, rest, key, prune)?;
        if prune && child.is_vacant() {
            node.children.remove(index);
        }
        Some(removed)
    }

    fn ensure_path(&mut self, segments: &[PathSegment]) -> &mut Node {
        let mut node = &mut self.root;
        for segment in segments {
            let index = match node.child_index(segment) {
                Some(index) => index,
                None => {
                    node.children.push(Node::from_segment(segment));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
        node
    }

    fn visit_path_mut(&mut self, segments: &[PathSegment], mut visit: impl FnMut(&PathSegment, &mut Node)) {
        let mut node = &mut self.root;
        for segment in segments {
            let Some(index) = node.child_index(segment) else {
                return;
            };
            node = &mut node.children[index];
            visit(segment, node);
        }
    }
}
