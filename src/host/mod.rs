//! Host browser contract.
//!
//! The host browser owns windows, tabs and tab groups; this crate only
//! queries and mutates them through the [`TabHost`] trait. The
//! production implementation is [`RemoteHost`], which speaks to the
//! companion extension over the WebSocket bridge; the test suite runs
//! against an in-memory implementation.

// ============================================================================
// Submodules
// ============================================================================

/// Host implementation over the WebSocket bridge.
pub mod remote;

#[cfg(test)]
pub(crate) mod fake;

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::identifiers::{GroupId, TabId, WindowId};
use crate::rules::GroupColor;

// ============================================================================
// Re-exports
// ============================================================================

pub use remote::RemoteHost;

// ============================================================================
// Types
// ============================================================================

/// A tab group as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabGroupInfo {
    /// Host-assigned group ID, unique within the window.
    pub group_id: GroupId,
    /// Display title.
    pub title: String,
    /// Current color.
    pub color: GroupColor,
}

/// The currently focused tab, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTab {
    /// Tab ID.
    pub tab_id: TabId,
    /// Current URL.
    pub url: String,
    /// Current title, if the page has one.
    pub title: Option<String>,
}

// ============================================================================
// TabHost
// ============================================================================

/// Tab, window and group operations provided by the host browser.
///
/// Every method is a suspension point: other events may interleave
/// between consecutive calls, which is why the group lookup-or-create
/// sequence in the engine serializes itself per window.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Resolves the window owning a tab.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TabNotFound`](crate::Error::TabNotFound) if the
    /// tab has been closed.
    async fn window_of(&self, tab_id: TabId) -> Result<WindowId>;

    /// Lists all tab groups currently existing in a window.
    async fn list_groups(&self, window_id: WindowId) -> Result<Vec<TabGroupInfo>>;

    /// Creates a new group containing only `tab_id` and returns its ID.
    ///
    /// The new group carries host defaults until
    /// [`update_group`](Self::update_group) is called.
    async fn create_group_with(&self, tab_id: TabId) -> Result<GroupId>;

    /// Sets a group's title and color.
    async fn update_group(&self, group_id: GroupId, title: &str, color: GroupColor) -> Result<()>;

    /// Adds a tab to an existing group.
    async fn add_to_group(&self, tab_id: TabId, group_id: GroupId) -> Result<()>;

    /// Returns the active tab of the focused window, if any.
    async fn active_tab(&self) -> Result<Option<ActiveTab>>;
}
