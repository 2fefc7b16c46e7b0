//! Ranked failure reports.
//!
//! A failed dispatch records a candidate every time a branch dies. The
//! report keeps only the candidates that got furthest (greatest depth, then
//! greatest rank), groups them by reason, and renders each group with the
//! usage lines that would have worked from the point of failure.
//!
//! ```text
//! Command help
//! Warning: No match.
//! /chunk status
//! /chunk preload <Whole #>
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::config::RouterConfig;
use crate::node::Node;

/// Why a branch of the search failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A literal word did not match.
    NoMatch,
    /// A typed slot's parser rejected the token.
    NotParsed,
    /// The token parsed but its filter rejected the value.
    FilterRejected,
    /// The sender lacks the command's permission.
    PermissionDenied,
    /// The command does not accept this kind of sender.
    SenderMismatch,
    /// Input ended before reaching a handler.
    NotEnoughArguments,
    /// A handler was reached with input left over.
    TooManyArguments,
    /// A parser panicked or a filter was malformed.
    Internal,
}

impl FailureKind {
    /// Ordering among failures at the same depth; higher wins.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Internal => 6,
            Self::PermissionDenied => 5,
            Self::SenderMismatch => 4,
            Self::NotEnoughArguments => 3,
            Self::NoMatch | Self::NotParsed | Self::FilterRejected => 1,
            Self::TooManyArguments => 0,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoMatch => "no match",
            Self::NotParsed => "not parsed",
            Self::FilterRejected => "filter rejected",
            Self::PermissionDenied => "permission denied",
            Self::SenderMismatch => "sender mismatch",
            Self::NotEnoughArguments => "not enough arguments",
            Self::TooManyArguments => "too many arguments",
            Self::Internal => "internal error",
        };
        f.write_str(name)
    }
}

/// A dead branch, recorded during the search.
#[derive(Debug)]
pub(crate) struct Candidate<'t> {
    /// Nodes from the command word to the node where the branch died.
    pub path: Vec<&'t Node>,
    /// Tokens consumed, counting the failing one.
    pub depth: usize,
    pub kind: FailureKind,
    pub reason: String,
}

impl Candidate<'_> {
    fn usages(&self, prefix: &str) -> Vec<String> {
        let Some((last, before)) = self.path.split_last() else {
            return Vec::new();
        };
        let leading: Vec<String> = before.iter().map(|node| node.render()).collect();
        last.possible_commands()
            .into_iter()
            .map(|tail| {
                let mut words = leading.clone();
                words.push(tail);
                format!("{prefix}{}", words.join(" "))
            })
            .collect()
    }
}

/// Failures that share a reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureGroup {
    /// Kind of the first candidate with this reason.
    pub kind: FailureKind,
    /// The message shown to the sender.
    pub reason: String,
    /// Usage lines that would have worked, shortest first.
    pub usages: Vec<String>,
}

/// Why a dispatch found no handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReport {
    /// How many tokens after the command word the best attempt consumed.
    pub depth: usize,
    /// Groups ordered by reason.
    pub groups: Vec<FailureGroup>,
}

impl FailureReport {
    pub(crate) fn from_candidates(candidates: Vec<Candidate<'_>>, config: &RouterConfig) -> Self {
        let Some(best) = candidates.iter().map(|c| (c.depth, c.kind.rank())).max() else {
            return Self {
                depth: 0,
                groups: Vec::new(),
            };
        };

        let mut grouped: BTreeMap<String, FailureGroup> = BTreeMap::new();
        for candidate in candidates.iter().filter(|c| (c.depth, c.kind.rank()) == best) {
            let group = grouped
                .entry(candidate.reason.clone())
                .or_insert_with(|| FailureGroup {
                    kind: candidate.kind,
                    reason: candidate.reason.clone(),
                    usages: Vec::new(),
                });
            group.usages.extend(candidate.usages(&config.command_prefix));
        }

        let groups = grouped
            .into_values()
            .map(|mut group| {
                group.usages.sort_by(|a, b| {
                    word_count(a)
                        .cmp(&word_count(b))
                        .then_with(|| a.cmp(b))
                });
                group.usages.dedup();
                group
            })
            .collect();

        Self { depth: best.0, groups }
    }

    /// Kind of the first group, if any candidate was recorded.
    #[must_use]
    pub fn kind(&self) -> Option<FailureKind> {
        self.groups.first().map(|g| g.kind)
    }

    /// Reasons, in report order.
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.reason.as_str())
    }

    /// Returns true if no candidate was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Renders the report as the lines sent to the sender.
    #[must_use]
    pub fn lines(&self, config: &RouterConfig) -> Vec<String> {
        if self.groups.is_empty() {
            return vec![config.no_help_message.clone()];
        }
        let mut lines = vec![config.help_header.clone()];
        for group in &self.groups {
            lines.push(format!("{}{}", config.warning_prefix, group.reason));
            lines.extend(group.usages.iter().cloned());
        }
        lines
    }
}

fn word_count(line: &str) -> usize {
    line.split(' ').count()
}
