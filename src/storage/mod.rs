//! Rule persistence.
//!
//! The rule list is mirrored to a [`RuleStore`] after every mutation and
//! loaded once at startup. Two implementations ship with the crate:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`JsonFileStore`] | JSON file on disk, atomically replaced on save |
//! | [`MemoryStore`] | Ephemeral in-process store |

// ============================================================================
// Submodules
// ============================================================================

/// JSON file store.
pub mod json;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::rules::Rule;

// ============================================================================
// Re-exports
// ============================================================================

pub use json::JsonFileStore;

// ============================================================================
// RuleStore
// ============================================================================

/// Persistent backing store for the ordered rule list.
///
/// `load` returns an empty list when nothing has been persisted yet;
/// `save` replaces the whole list and is called after every mutation.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Loads the persisted rules in stored order.
    async fn load(&self) -> Result<Vec<Rule>>;

    /// Persists the full rule list, replacing any previous contents.
    async fn save(&self, rules: &[Rule]) -> Result<()>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Ephemeral in-process rule store.
///
/// Used when persistence is not configured, and by the test suite.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rules: Mutex<Vec<Rule>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with rules.
    #[must_use]
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules: Mutex::new(rules),
        }
    }
}

#[async_trait]
impl RuleStore for MemoryStore {
    async fn load(&self) -> Result<Vec<Rule>> {
        Ok(self.rules.lock().clone())
    }

    async fn save(&self, rules: &[Rule]) -> Result<()> {
        *self.rules.lock() = rules.to_vec();
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
