//! Tab placement into host groups.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::Result;
use crate::host::TabHost;
use crate::identifiers::{TabId, WindowId};
use crate::rules::GroupColor;

// ============================================================================
// Grouper
// ============================================================================

/// Places tabs into same-titled groups within their own window.
///
/// Placement is lookup-or-create: an existing group with the exact
/// label is reused (its color is left alone), otherwise a new group is
/// created and titled. The lookup-or-create sequence spans several host
/// suspension points, so it is serialized per window — two placements
/// racing on the same label in one window cannot both create a group
/// through this grouper. Duplicate-titled groups that already exist on
/// the host side are tolerated; the first title match wins.
pub struct Grouper {
    /// Host browser handle.
    host: Arc<dyn TabHost>,
    /// One placement lock per window.
    window_locks: Mutex<FxHashMap<WindowId, Arc<tokio::sync::Mutex<()>>>>,
}

impl Grouper {
    /// Creates a grouper over the given host.
    #[must_use]
    pub fn new(host: Arc<dyn TabHost>) -> Self {
        Self {
            host,
            window_locks: Mutex::new(FxHashMap::default()),
        }
    }

    /// Places `tab_id` into the group titled `label` in its own window,
    /// creating the group with `color` when it does not exist yet.
    ///
    /// An existing group's color is never overwritten by a later match
    /// with the same label and a different derived color.
    ///
    /// # Errors
    ///
    /// Propagates host failures (tab closed, window gone). The caller
    /// does not retry; the next qualifying event re-evaluates.
    pub async fn place(&self, tab_id: TabId, label: &str, color: GroupColor) -> Result<()> {
        let window_id = self.host.window_of(tab_id).await?;

        let lock = self.window_lock(window_id);
        let _guard = lock.lock().await;

        let groups = self.host.list_groups(window_id).await?;

        if let Some(group) = groups.iter().find(|g| g.title == label) {
            debug!(
                tab_id = %tab_id,
                window_id = %window_id,
                group_id = %group.group_id,
                label = %label,
                "Adding tab to existing group"
            );
            self.host.add_to_group(tab_id, group.group_id).await?;
        } else {
            let group_id = self.host.create_group_with(tab_id).await?;
            self.host.update_group(group_id, label, color).await?;
            debug!(
                tab_id = %tab_id,
                window_id = %window_id,
                group_id = %group_id,
                label = %label,
                color = %color,
                "Created new group"
            );
        }

        Ok(())
    }

    /// Returns the placement lock for a window, creating it on first use.
    fn window_lock(&self, window_id: WindowId) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(
            self.window_locks
                .lock()
                .entry(window_id)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
