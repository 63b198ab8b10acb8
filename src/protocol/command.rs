//! Command definitions organized by module.
//!
//! Commands follow the `module.methodName` format the companion
//! extension executes against the browser's tab and tab-group APIs.
//!
//! # Command Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | `tabs` | Tab lookup, active tab, grouping |
//! | `tabGroups` | Group query and update |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::identifiers::{GroupId, TabId, WindowId};
use crate::rules::GroupColor;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands organized by module.
///
/// This enum wraps module-specific command enums for unified
/// serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Tabs module commands.
    Tabs(TabsCommand),
    /// TabGroups module commands.
    TabGroups(TabGroupsCommand),
}

// ============================================================================
// Tabs Commands
// ============================================================================

/// Tabs module commands for tab lookup and grouping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabsCommand {
    /// Get a tab's window, URL and title.
    #[serde(rename = "tabs.get")]
    Get {
        /// Tab to look up.
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },

    /// Get the active tab of the focused window.
    #[serde(rename = "tabs.getActive")]
    GetActive,

    /// Add tabs to a group, or create a fresh group when `group_id`
    /// is absent.
    #[serde(rename = "tabs.group")]
    Group {
        /// Tabs to place.
        #[serde(rename = "tabIds")]
        tab_ids: Vec<TabId>,
        /// Existing group to join; omit to create a new one.
        #[serde(rename = "groupId", skip_serializing_if = "Option::is_none")]
        group_id: Option<GroupId>,
    },
}

// ============================================================================
// TabGroups Commands
// ============================================================================

/// TabGroups module commands for group query and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum TabGroupsCommand {
    /// List all groups in a window.
    #[serde(rename = "tabGroups.query")]
    Query {
        /// Window to inspect.
        #[serde(rename = "windowId")]
        window_id: WindowId,
    },

    /// Set a group's title and color.
    #[serde(rename = "tabGroups.update")]
    Update {
        /// Group to update.
        #[serde(rename = "groupId")]
        group_id: GroupId,
        /// New display title.
        title: String,
        /// New color.
        color: GroupColor,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_get_serialization() {
        let command = Command::Tabs(TabsCommand::Get {
            tab_id: TabId::new(7).expect("valid tab id"),
        });
        let json = serde_json::to_string(&command).expect("serialize");

        assert!(json.contains(r#""method":"tabs.get""#));
        assert!(json.contains(r#""tabId":7"#));
    }

    #[test]
    fn test_group_create_omits_group_id() {
        let command = Command::Tabs(TabsCommand::Group {
            tab_ids: vec![TabId::new(3).expect("valid tab id")],
            group_id: None,
        });
        let json = serde_json::to_string(&command).expect("serialize");

        assert!(json.contains(r#""method":"tabs.group""#));
        assert!(json.contains(r#""tabIds":[3]"#));
        assert!(!json.contains("groupId"));
    }

    #[test]
    fn test_group_join_carries_group_id() {
        let command = Command::Tabs(TabsCommand::Group {
            tab_ids: vec![TabId::new(3).expect("valid tab id")],
            group_id: Some(GroupId::new(9)),
        });
        let json = serde_json::to_string(&command).expect("serialize");

        assert!(json.contains(r#""groupId":9"#));
    }

    #[test]
    fn test_tab_groups_update_serialization() {
        let command = Command::TabGroups(TabGroupsCommand::Update {
            group_id: GroupId::new(4),
            title: "work".to_string(),
            color: GroupColor::Cyan,
        });
        let json = serde_json::to_string(&command).expect("serialize");

        assert!(json.contains(r#""method":"tabGroups.update""#));
        assert!(json.contains(r#""title":"work""#));
        assert!(json.contains(r#""color":"cyan""#));
    }

    #[test]
    fn test_tab_groups_query_roundtrip() {
        let command = Command::TabGroups(TabGroupsCommand::Query {
            window_id: WindowId::new(2),
        });
        let json = serde_json::to_string(&command).expect("serialize");
        let back: Command = serde_json::from_str(&json).expect("deserialize");

        assert!(matches!(
            back,
            Command::TabGroups(TabGroupsCommand::Query { window_id }) if window_id == WindowId::new(2)
        ));
    }
}
