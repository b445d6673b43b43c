//! domcanon Core Library
//!
//! This crate holds the data model and the algorithms used to canonicalize
//! domain rule lists. Everything here is pure and synchronous; line parsing
//! and I/O live in `dc-compiler` and `dc-cli`.
//!
//! # Modules
//!
//! - `types`: `Domain` and rule-form flags
//! - `psl`: Suffix table and longest-match suffix splitting
//! - `reduce`: Trie-based redundancy reduction
//! - `order`: Suffix-ignoring canonical sort order

pub mod order;
pub mod psl;
pub mod reduce;
pub mod types;

// Re-export commonly used types
pub use order::{compare_domains, sort_canonical, SortKey};
pub use psl::{SuffixSplit, SuffixTable};
pub use reduce::{reduce_domains, LabelTrie, ReduceStats};
pub use types::{Domain, DomainError, RuleFlags};
