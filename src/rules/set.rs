//! Ordered rule collection mirrored to a persistent store.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::identifiers::RuleId;
use crate::storage::RuleStore;

use super::Rule;

// ============================================================================
// RuleSet
// ============================================================================

/// In-memory ordered collection of rules, mirrored to a [`RuleStore`].
///
/// Rule order is insertion order and is significant: evaluation stops at
/// the first matching active rule, so earlier rules shadow later ones.
///
/// Mutations are write-ahead: the candidate list is persisted first and
/// committed to memory only when the store accepts it, so a failed save
/// leaves the in-memory list at its pre-mutation state. Every mutation
/// and every [`snapshot`](Self::snapshot) is atomic with respect to the
/// others — an in-flight evaluation sees either the full pre- or full
/// post-mutation list, never a partial edit.
pub struct RuleSet {
    /// Ordered rules.
    rules: RwLock<Vec<Rule>>,
    /// Persistent mirror.
    store: Arc<dyn RuleStore>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("len", &self.rules.read().len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// RuleSet - Constructor
// ============================================================================

impl RuleSet {
    /// Loads the rule set from its store.
    ///
    /// An empty or absent store yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the store cannot be read.
    pub async fn load(store: Arc<dyn RuleStore>) -> Result<Self> {
        let rules = store.load().await?;
        info!(count = rules.len(), "Rule set loaded");

        Ok(Self {
            rules: RwLock::new(rules),
            store,
        })
    }
}

// ============================================================================
// RuleSet - Read Operations
// ============================================================================

impl RuleSet {
    /// Returns a copy of the full rule list in stored order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rule> {
        self.rules.read().clone()
    }

    /// Looks up a rule by ID.
    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<Rule> {
        self.rules.read().iter().find(|r| r.id == id).cloned()
    }

    /// Returns the number of rules.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Returns `true` if the set holds no rules.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

// ============================================================================
// RuleSet - Write Operations
// ============================================================================

impl RuleSet {
    /// Saves a rule: updates in place when the ID is known, otherwise
    /// appends as a new rule under a fresh unique ID.
    ///
    /// The incoming ID is discarded on the append path; the caller gets
    /// the stored form back, including the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the store rejects the write;
    /// the in-memory list is left unchanged in that case.
    pub async fn save(&self, rule: Rule) -> Result<Rule> {
        let mut candidate = self.snapshot();

        let saved = match candidate.iter().position(|r| r.id == rule.id) {
            Some(index) => {
                candidate[index] = rule.clone();
                debug!(rule_id = %rule.id, "Rule updated");
                rule
            }
            None => {
                let rule = Rule {
                    id: Self::fresh_id(&candidate),
                    ..rule
                };
                debug!(rule_id = %rule.id, pattern = %rule.pattern, "Rule created");
                candidate.push(rule.clone());
                rule
            }
        };

        self.store.save(&candidate).await?;
        *self.rules.write() = candidate;
        Ok(saved)
    }

    /// Removes a rule by ID.
    ///
    /// # Errors
    ///
    /// - [`Error::RuleNotFound`] if no rule has the ID
    /// - [`Error::Persistence`] if the store rejects the write; the
    ///   in-memory list is left unchanged
    pub async fn remove(&self, id: RuleId) -> Result<()> {
        let mut candidate = self.snapshot();

        let index = candidate
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::rule_not_found(id))?;
        candidate.remove(index);

        self.store.save(&candidate).await?;
        *self.rules.write() = candidate;

        debug!(rule_id = %id, "Rule removed");
        Ok(())
    }

    /// Generates an ID not present in `rules`.
    ///
    /// IDs are wall-clock milliseconds; two creates inside the same
    /// millisecond collide, so a colliding draw is bumped past the
    /// current maximum.
    fn fresh_id(rules: &[Rule]) -> RuleId {
        let id = RuleId::generate();
        match rules.iter().map(|r| r.id).max() {
            Some(max) if id <= max => max.next(),
            _ => id,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
