//! Redundancy reduction over a domain set
//!
//! A rule for `example.com` already matches `a.example.com`, so the latter is
//! redundant. [`reduce_domains`] keeps only the most general domain of every
//! branch, producing the minimal cover of the input under the relation
//! "X matches Y iff Y == X or Y ends with `.X`".
//!
//! # Algorithm
//!
//! Labels are inserted top-level first into an arena trie, so domains sharing
//! a suffix share a path. Domains are visited fewest labels first (ties broken
//! lexically); a domain whose walk reaches a node already marked terminal has
//! an accepted ancestor (or is a duplicate) and is dropped. The cost is linear
//! in the total number of labels.

use std::collections::HashMap;

use crate::types::Domain;

/// Index of the root node in a [`LabelTrie`].
pub const ROOT: usize = 0;

#[derive(Debug, Default)]
struct Node {
    children: HashMap<String, usize>,
    terminal: bool,
}

/// Arena trie keyed by domain labels in reverse order.
#[derive(Debug)]
pub struct LabelTrie {
    nodes: Vec<Node>,
}

impl Default for LabelTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    pub fn with_capacity(nodes: usize) -> Self {
        let mut arena = Vec::with_capacity(nodes.max(1));
        arena.push(Node::default());
        Self { nodes: arena }
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert `domain` unless an ancestor (or the domain itself) is already
    /// terminal. Returns `true` if the domain was inserted and marked.
    pub fn insert_if_uncovered(&mut self, domain: &Domain) -> bool {
        let mut node = ROOT;
        for label in domain.labels().rev() {
            node = match self.nodes[node].children.get(label) {
                Some(&child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(label.to_string(), child);
                    child
                }
            };
            if self.nodes[node].terminal {
                return false;
            }
        }
        self.nodes[node].terminal = true;
        true
    }
}

/// Outcome counters for a reduction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReduceStats {
    pub before: usize,
    pub after: usize,
    pub removed: usize,
}

/// Reduce `domains` to the minimal cover.
///
/// The result comes back in processing order (fewest labels first); run it
/// through [`crate::order::sort_canonical`] for output order.
///
/// ```
/// use dc_core::{reduce_domains, Domain};
///
/// let input: Vec<Domain> = ["example.com", "a.example.com", "b.a.example.com", "other.org"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// let (kept, stats) = reduce_domains(input);
/// let kept: Vec<&str> = kept.iter().map(|d| d.as_str()).collect();
/// assert_eq!(kept, ["example.com", "other.org"]);
/// assert_eq!(stats.removed, 2);
/// ```
pub fn reduce_domains<I>(domains: I) -> (Vec<Domain>, ReduceStats)
where
    I: IntoIterator<Item = Domain>,
{
    let mut ordered: Vec<(usize, Domain)> = domains
        .into_iter()
        .map(|d| (d.label_count(), d))
        .collect();
    ordered.sort_unstable();

    let before = ordered.len();
    let total_labels: usize = ordered.iter().map(|(n, _)| n).sum();
    let mut trie = LabelTrie::with_capacity(total_labels + 1);
    let mut kept = Vec::new();

    for (_, domain) in ordered {
        if trie.insert_if_uncovered(&domain) {
            kept.push(domain);
        }
    }

    let stats = ReduceStats {
        before,
        after: kept.len(),
        removed: before - kept.len(),
    };
    log::debug!(
        "Reduced {} -> {} domains ({} trie nodes)",
        stats.before,
        stats.after,
        trie.node_count()
    );

    (kept, stats)
}
