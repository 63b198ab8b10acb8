//! Rule evaluation.
//!
//! The matcher decides whether a tab belongs to a group, and if so,
//! which one. Active rules are evaluated in stored order against the
//! tab's URL first and its title second; the first match wins and ends
//! the evaluation.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::host::TabHost;
use crate::identifiers::{RuleId, TabId};
use crate::rules::{GroupColor, Rule};

use super::Grouper;

// ============================================================================
// MatchDecision
// ============================================================================

/// Outcome of a successful rule match: where the tab should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDecision {
    /// The rule that matched.
    pub rule_id: RuleId,
    /// Derived group label.
    pub label: String,
    /// Derived group color.
    pub color: GroupColor,
}

// ============================================================================
// Evaluation
// ============================================================================

/// Evaluates rules against a tab's URL and title.
///
/// The URL pass takes priority: the title pass only runs when no rule
/// matched the URL, and only for a non-empty title. Within a pass,
/// active rules are tried in stored order and the first match wins.
/// A rule whose pattern fails to compile is skipped for that pass.
#[must_use]
pub fn match_rules(rules: &[Rule], url: &str, title: Option<&str>) -> Option<MatchDecision> {
    if let Some(decision) = match_pass(rules, url) {
        return Some(decision);
    }

    match title {
        Some(title) if !title.is_empty() => match_pass(rules, title),
        _ => None,
    }
}

/// Runs one ordered pass of all active rules against a single input.
fn match_pass(rules: &[Rule], input: &str) -> Option<MatchDecision> {
    for rule in rules {
        if !rule.active {
            continue;
        }

        let regex = match rule.compile() {
            Ok(regex) => regex,
            Err(e) => {
                warn!(rule_id = %rule.id, error = %e, "Skipping rule with invalid pattern");
                continue;
            }
        };

        if let Some(captures) = regex.captures(input) {
            return Some(derive_decision(rule, captures.get(1).map(|m| m.as_str())));
        }
    }

    None
}

/// Derives the group label and color from a match.
///
/// Only the first capture group is consulted; later groups are ignored.
/// A first group that did not participate in the match falls back to
/// the rule's literal label.
fn derive_decision(rule: &Rule, capture: Option<&str>) -> MatchDecision {
    let label = match capture {
        Some(text) if rule.use_capture => text.to_string(),
        _ => rule.group_label.clone(),
    };

    let color = if rule.use_random_color && rule.use_capture && capture.is_some() {
        GroupColor::random()
    } else {
        rule.color
    };

    MatchDecision {
        rule_id: rule.id,
        label,
        color,
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Evaluates rules for a tab and places it on a match.
pub struct Matcher {
    /// Group placement.
    grouper: Grouper,
}

impl Matcher {
    /// Creates a matcher placing tabs through the given host.
    #[must_use]
    pub fn new(host: Arc<dyn TabHost>) -> Self {
        Self {
            grouper: Grouper::new(host),
        }
    }

    /// Evaluates `rules` against a tab and groups it on the first match.
    ///
    /// Returns `Ok(true)` if a rule matched and the tab was placed,
    /// `Ok(false)` if nothing matched. A non-match has no side effects.
    ///
    /// # Errors
    ///
    /// Propagates host failures from the placement; evaluation itself
    /// never fails (invalid patterns are skipped per pass).
    pub async fn evaluate(
        &self,
        rules: &[Rule],
        url: &str,
        title: Option<&str>,
        tab_id: TabId,
    ) -> Result<bool> {
        let Some(decision) = match_rules(rules, url, title) else {
            debug!(tab_id = %tab_id, "No rule matched");
            return Ok(false);
        };

        debug!(
            tab_id = %tab_id,
            rule_id = %decision.rule_id,
            label = %decision.label,
            color = %decision.color,
            "Rule matched"
        );

        self.grouper
            .place(tab_id, &decision.label, decision.color)
            .await?;
        Ok(true)
    }
}

// ============================================================================
// Tests
// ============================================================================
