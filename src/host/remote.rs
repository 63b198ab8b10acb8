//! Host implementation over the WebSocket bridge.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::{GroupId, TabId, WindowId};
use crate::protocol::{Command, Request, TabGroupsCommand, TabsCommand};
use crate::rules::GroupColor;
use crate::transport::Connection;

use super::{ActiveTab, TabGroupInfo, TabHost};

// ============================================================================
// RemoteHost
// ============================================================================

/// [`TabHost`] backed by the companion extension.
///
/// Every operation is one protocol request; the extension executes it
/// against the browser's tab and tab-group APIs and reports the result.
#[derive(Clone)]
pub struct RemoteHost {
    /// Connection to the extension.
    connection: Connection,
}

impl RemoteHost {
    /// Creates a host over an established connection.
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TabHost for RemoteHost {
    async fn window_of(&self, tab_id: TabId) -> Result<WindowId> {
        let request = Request::new(Command::Tabs(TabsCommand::Get { tab_id }));
        let response = self.connection.send(request).await?;

        if response.is_error() {
            return Err(match response.error.as_deref() {
                Some("no such tab") => Error::tab_not_found(tab_id),
                _ => Error::host_operation(
                    response
                        .message
                        .unwrap_or_else(|| "tabs.get failed".to_string()),
                ),
            });
        }

        let raw = response.get_u64("windowId");
        if raw == 0 {
            return Err(Error::protocol("Expected windowId in tabs.get response"));
        }

        Ok(WindowId::new(raw as u32))
    }

    async fn list_groups(&self, window_id: WindowId) -> Result<Vec<TabGroupInfo>> {
        let request = Request::new(Command::TabGroups(TabGroupsCommand::Query { window_id }));
        let result = self.connection.send(request).await?.into_result()?;

        let groups = result
            .get("groups")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let groups: Vec<TabGroupInfo> = groups
            .iter()
            .filter_map(|g| {
                let group_id = GroupId::new(g.get("groupId")?.as_u64()? as u32);
                let title = g.get("title").and_then(|v| v.as_str()).unwrap_or_default();
                // Colors outside the rule palette (host-created groups)
                // fold to grey; placement only compares titles.
                let color = g
                    .get("color")
                    .and_then(|v| v.as_str())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(GroupColor::Grey);
                Some(TabGroupInfo {
                    group_id,
                    title: title.to_string(),
                    color,
                })
            })
            .collect();

        debug!(window_id = %window_id, count = groups.len(), "Groups listed");
        Ok(groups)
    }

    async fn create_group_with(&self, tab_id: TabId) -> Result<GroupId> {
        let request = Request::new(Command::Tabs(TabsCommand::Group {
            tab_ids: vec![tab_id],
            group_id: None,
        }));
        let result = self.connection.send(request).await?.into_result()?;

        let raw = result
            .get("groupId")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::protocol("Expected groupId in tabs.group response"))?;

        Ok(GroupId::new(raw as u32))
    }

    async fn update_group(&self, group_id: GroupId, title: &str, color: GroupColor) -> Result<()> {
        let request = Request::new(Command::TabGroups(TabGroupsCommand::Update {
            group_id,
            title: title.to_string(),
            color,
        }));
        self.connection.send(request).await?.into_result()?;
        Ok(())
    }

    async fn add_to_group(&self, tab_id: TabId, group_id: GroupId) -> Result<()> {
        let request = Request::new(Command::Tabs(TabsCommand::Group {
            tab_ids: vec![tab_id],
            group_id: Some(group_id),
        }));
        self.connection.send(request).await?.into_result()?;
        Ok(())
    }

    async fn active_tab(&self) -> Result<Option<ActiveTab>> {
        let request = Request::new(Command::Tabs(TabsCommand::GetActive));
        let response = self.connection.send(request).await?;

        if response.is_error() {
            return Ok(None);
        }

        // An empty result means no tab is focused (all windows minimized).
        let Some(tab_id) = TabId::new(response.get_u64("tabId") as u32) else {
            return Ok(None);
        };

        Ok(Some(ActiveTab {
            tab_id,
            url: response.get_string("url"),
            title: response.get_optional_string("title"),
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
