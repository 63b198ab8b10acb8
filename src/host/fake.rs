//! In-memory host used by the test suite.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::identifiers::{GroupId, TabId, WindowId};
use crate::rules::GroupColor;

use super::{ActiveTab, TabGroupInfo, TabHost};

// ============================================================================
// FakeHost
// ============================================================================

/// In-memory [`TabHost`] with the same observable semantics as the
/// browser bridge. Every trait method yields once before touching
/// state, so interleavings across suspension points are exercised.
#[derive(Default)]
pub(crate) struct FakeHost {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    /// Tab → owning window.
    tabs: FxHashMap<TabId, WindowId>,
    /// Window → groups in creation order.
    groups: FxHashMap<WindowId, Vec<TabGroupInfo>>,
    /// Tab → group membership.
    memberships: FxHashMap<TabId, GroupId>,
    /// The focused tab, if any.
    active: Option<ActiveTab>,
    /// Next group ID to hand out.
    next_group: u32,
    /// Number of `create_group_with` calls observed.
    created: u32,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a tab in a window.
    pub(crate) fn insert_tab(&self, tab_id: TabId, window_id: WindowId) {
        self.state.lock().tabs.insert(tab_id, window_id);
    }

    /// Sets the focused tab reported by `active_tab`.
    pub(crate) fn set_active(&self, active: ActiveTab) {
        self.state.lock().active = Some(active);
    }

    /// Pre-seeds a group, as if another actor had created it.
    pub(crate) fn seed_group(
        &self,
        window_id: WindowId,
        title: &str,
        color: GroupColor,
    ) -> GroupId {
        let mut state = self.state.lock();
        state.next_group += 1;
        let group_id = GroupId::new(state.next_group);
        state.groups.entry(window_id).or_default().push(TabGroupInfo {
            group_id,
            title: title.to_string(),
            color,
        });
        group_id
    }

    /// Returns the groups of a window in creation order.
    pub(crate) fn groups_in(&self, window_id: WindowId) -> Vec<TabGroupInfo> {
        self.state
            .lock()
            .groups
            .get(&window_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the group a tab belongs to, if any.
    pub(crate) fn group_of(&self, tab_id: TabId) -> Option<GroupId> {
        self.state.lock().memberships.get(&tab_id).copied()
    }

    /// Returns how many groups this host was asked to create.
    pub(crate) fn created_count(&self) -> u32 {
        self.state.lock().created
    }
}

#[async_trait]
impl TabHost for FakeHost {
    async fn window_of(&self, tab_id: TabId) -> Result<WindowId> {
        tokio::task::yield_now().await;
        self.state
            .lock()
            .tabs
            .get(&tab_id)
            .copied()
            .ok_or_else(|| Error::tab_not_found(tab_id))
    }

    async fn list_groups(&self, window_id: WindowId) -> Result<Vec<TabGroupInfo>> {
        tokio::task::yield_now().await;
        Ok(self.groups_in(window_id))
    }

    async fn create_group_with(&self, tab_id: TabId) -> Result<GroupId> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();

        let window_id = *state
            .tabs
            .get(&tab_id)
            .ok_or_else(|| Error::tab_not_found(tab_id))?;

        state.next_group += 1;
        state.created += 1;
        let group_id = GroupId::new(state.next_group);

        state.groups.entry(window_id).or_default().push(TabGroupInfo {
            group_id,
            title: String::new(),
            color: GroupColor::Grey,
        });
        state.memberships.insert(tab_id, group_id);
        Ok(group_id)
    }

    async fn update_group(&self, group_id: GroupId, title: &str, color: GroupColor) -> Result<()> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();

        for groups in state.groups.values_mut() {
            if let Some(group) = groups.iter_mut().find(|g| g.group_id == group_id) {
                group.title = title.to_string();
                group.color = color;
                return Ok(());
            }
        }

        Err(Error::host_operation(format!("no such group: {group_id}")))
    }

    async fn add_to_group(&self, tab_id: TabId, group_id: GroupId) -> Result<()> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();

        if !state.tabs.contains_key(&tab_id) {
            return Err(Error::tab_not_found(tab_id));
        }
        state.memberships.insert(tab_id, group_id);
        Ok(())
    }

    async fn active_tab(&self) -> Result<Option<ActiveTab>> {
        tokio::task::yield_now().await;
        Ok(self.state.lock().active.clone())
    }
}
