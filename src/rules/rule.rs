//! Grouping rule definition and save-time validation.

// ============================================================================
// Imports
// ============================================================================

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identifiers::RuleId;

use super::GroupColor;

// ============================================================================
// Rule
// ============================================================================

/// A stored regex-based matching configuration producing a group label
/// and color.
///
/// Rules are created and edited through the settings surface, persisted
/// on every mutation, and evaluated in stored order against a tab's URL
/// and title. The `pattern` is kept as source text and compiled lazily
/// at evaluation time.
///
/// # Wire Format
///
/// ```json
/// {
///   "id": 1718901234567,
///   "pattern": "github\\.com/([^/]+)",
///   "groupLabel": "git",
///   "useCapture": true,
///   "useRandomColor": false,
///   "color": "blue",
///   "active": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique identifier, assigned at creation and immutable.
    ///
    /// A wire form without an ID deserializes with a fresh one, which
    /// lands it on the create path of the rule set.
    #[serde(default = "RuleId::generate")]
    pub id: RuleId,

    /// Regular-expression source matched against URL and title.
    pub pattern: String,

    /// Literal group name, used unless a capture override applies.
    pub group_label: String,

    /// Replace the label with the first capture group's text when the
    /// match produced one.
    pub use_capture: bool,

    /// Draw the color at random per match instead of using `color`.
    /// Only effective together with `use_capture` and a present capture.
    #[serde(default)]
    pub use_random_color: bool,

    /// Fixed group color.
    pub color: GroupColor,

    /// Inactive rules are skipped entirely during evaluation.
    pub active: bool,
}

impl Rule {
    /// Creates an active rule with a fresh ID.
    #[must_use]
    pub fn new(
        pattern: impl Into<String>,
        group_label: impl Into<String>,
        color: GroupColor,
    ) -> Self {
        Self {
            id: RuleId::generate(),
            pattern: pattern.into(),
            group_label: group_label.into(),
            use_capture: false,
            use_random_color: false,
            color,
            active: true,
        }
    }

    /// Enables capture-group labeling.
    #[must_use]
    pub fn with_capture(mut self) -> Self {
        self.use_capture = true;
        self
    }

    /// Enables per-match random coloring.
    #[must_use]
    pub fn with_random_color(mut self) -> Self {
        self.use_random_color = true;
        self
    }

    /// Marks the rule inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Validates the rule for saving.
    ///
    /// Rejects empty pattern or label and patterns that do not compile.
    /// Evaluation never calls this; an invalid stored pattern is skipped
    /// per pass instead.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if pattern or label is empty
    /// - [`Error::InvalidPattern`] if the pattern does not compile
    pub fn validate(&self) -> Result<()> {
        if self.pattern.trim().is_empty() {
            return Err(Error::validation("pattern must not be empty"));
        }
        if self.group_label.trim().is_empty() {
            return Err(Error::validation("group label must not be empty"));
        }
        Regex::new(&self.pattern)
            .map_err(|e| Error::invalid_pattern(&self.pattern, e.to_string()))?;
        Ok(())
    }

    /// Compiles the pattern, if it is syntactically valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] on compile failure.
    pub fn compile(&self) -> Result<Regex> {
        Regex::new(&self.pattern).map_err(|e| Error::invalid_pattern(&self.pattern, e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
