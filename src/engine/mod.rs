//! Rule-matching and tab-grouping engine.
//!
//! The engine decides which group a tab belongs to and puts it there:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Matcher`] | Ordered two-pass rule evaluation |
//! | [`Grouper`] | Lookup-or-create placement within a window |
//! | [`MatchDecision`] | Derived (rule, label, color) of a match |
//!
//! The pure evaluation logic is exposed as [`match_rules`] for callers
//! that only need the decision.

// ============================================================================
// Submodules
// ============================================================================

/// Rule evaluation.
pub mod matcher;

/// Tab placement.
pub mod grouper;

// ============================================================================
// Re-exports
// ============================================================================

pub use grouper::Grouper;
pub use matcher::{MatchDecision, Matcher, match_rules};
