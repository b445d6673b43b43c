//! domcanon Rule List Compiler
//!
//! This crate turns heterogeneous rule lists (Clash/Surge payloads, ABP
//! host rules, hosts files, plain domain lists) into a canonical domain list.
//!
//! # Pipeline
//!
//! raw lines → `normalize` → `extract` (+ `config` deny/allow tables) →
//! domain set → `dc_core::reduce` → `dc_core::order` → output text.

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod normalize;
pub mod pipeline;

pub use config::{CanonConfig, FilterConfig, Preset};
pub use error::CanonError;
pub use extract::{ExtractedRule, LineOutcome, RuleExtractor, SkipReason};
pub use filter::{FilterOutcome, LineFilter};
pub use pipeline::{CanonStats, Canonical, Canonicalizer, ExtractedChunk};
