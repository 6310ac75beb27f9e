#![forbid(unsafe_code)]

//! Rule definitions and registry

mod pattern;
mod registry;
mod rule_set;

// Re-export core types
pub use pattern::{MatchMode, PatternRule};
pub use registry::RuleRegistry;
pub use rule_set::{CallMatch, RuleSet, RuleSetKind};
