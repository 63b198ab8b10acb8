//! Event message types.
//!
//! Events are notifications sent from the remote end (extension) to the
//! local end (Rust): tab lifecycle changes and settings-surface
//! requests. Settings events carry a correlation ID and expect an
//! [`EventReply`] on the same socket.
//!
//! # Event Types
//!
//! | Module | Events |
//! |--------|--------|
//! | `tabs` | `updated` |
//! | `settings` | `getPatterns`, `savePattern`, `deletePattern`, `applyToCurrentTab` |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::identifiers::RequestId;
use crate::rules::Rule;

// ============================================================================
// Event
// ============================================================================

/// An event notification from remote end to local end.
///
/// # Format
///
/// ```json
/// {
///   "id": "event-uuid",
///   "type": "event",
///   "method": "module.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Unique identifier for EventReply correlation.
    pub id: RequestId,

    /// Event type marker (always "event").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event name in `module.eventName` format.
    pub method: String,

    /// Event-specific data.
    pub params: Value,
}

impl Event {
    /// Returns the module name from the method.
    #[inline]
    #[must_use]
    pub fn module(&self) -> &str {
        self.method.split('.').next().unwrap_or_default()
    }

    /// Returns the event name from the method.
    #[inline]
    #[must_use]
    pub fn event_name(&self) -> &str {
        self.method.split('.').nth(1).unwrap_or_default()
    }

    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        self.parse_internal()
    }
}

// ============================================================================
// EventReply
// ============================================================================

/// A reply from local end to remote end for events requiring a decision.
///
/// Used for settings-surface requests: the popup keeps its message
/// channel open until the reply with the matching `id` arrives.
///
/// # Format
///
/// ```json
/// {
///   "id": "event-uuid",
///   "replyTo": "settings.applyToCurrentTab",
///   "result": { "matched": true }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct EventReply {
    /// Matches the event's ID.
    pub id: RequestId,

    /// Event method being replied to.
    #[serde(rename = "replyTo")]
    pub reply_to: String,

    /// Decision/result payload.
    pub result: Value,
}

impl EventReply {
    /// Creates a new event reply.
    #[inline]
    #[must_use]
    pub fn new(id: RequestId, reply_to: impl Into<String>, result: Value) -> Self {
        Self {
            id,
            reply_to: reply_to.into(),
            result,
        }
    }

    /// Creates a `getPatterns` reply carrying the full rule list.
    #[must_use]
    pub fn patterns(id: RequestId, rules: &[Rule]) -> Self {
        Self::new(id, "settings.getPatterns", json!({ "patterns": rules }))
    }

    /// Creates a successful `savePattern` reply with the stored form.
    #[must_use]
    pub fn saved(id: RequestId, rule: &Rule) -> Self {
        Self::new(
            id,
            "settings.savePattern",
            json!({ "success": true, "pattern": rule }),
        )
    }

    /// Creates a successful `deletePattern` reply.
    #[must_use]
    pub fn deleted(id: RequestId) -> Self {
        Self::new(id, "settings.deletePattern", json!({ "success": true }))
    }

    /// Creates an `applyToCurrentTab` reply.
    #[must_use]
    pub fn matched(id: RequestId, matched: bool) -> Self {
        Self::new(
            id,
            "settings.applyToCurrentTab",
            json!({ "matched": matched }),
        )
    }

    /// Creates a failure reply with a descriptive message.
    #[must_use]
    pub fn failure(id: RequestId, reply_to: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            reply_to,
            json!({ "success": false, "error": message.into() }),
        )
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Parsed event types for type-safe handling.
#[derive(Debug, Clone)]
pub enum ParsedEvent {
    /// A tab's load state changed.
    TabUpdated {
        /// Tab ID.
        tab_id: u32,
        /// Load status (`loading` or `complete`).
        status: String,
        /// Current URL.
        url: String,
        /// Current title, if any.
        title: Option<String>,
    },

    /// Settings surface asks for the rule list.
    SettingsGetPatterns,

    /// Settings surface saves a rule (create or update).
    SettingsSavePattern {
        /// The rule object as sent; validated by the organizer.
        pattern: Value,
    },

    /// Settings surface deletes a rule.
    SettingsDeletePattern {
        /// ID of the rule to delete.
        id: u64,
    },

    /// Settings surface asks to group the active tab now.
    SettingsApplyToCurrentTab,

    /// Unknown event type.
    Unknown {
        /// Event method.
        method: String,
        /// Event params.
        params: Value,
    },
}

// ============================================================================
// Event Parsing Implementation
// ============================================================================

impl Event {
    /// Internal parsing implementation.
    fn parse_internal(&self) -> ParsedEvent {
        match self.method.as_str() {
            "tabs.updated" => ParsedEvent::TabUpdated {
                tab_id: self.get_u64("tabId") as u32,
                status: self.get_string("status"),
                url: self.get_string("url"),
                title: self.get_optional_string("title"),
            },

            "settings.getPatterns" => ParsedEvent::SettingsGetPatterns,

            "settings.savePattern" => ParsedEvent::SettingsSavePattern {
                pattern: self.params.get("pattern").cloned().unwrap_or(Value::Null),
            },

            "settings.deletePattern" => ParsedEvent::SettingsDeletePattern {
                id: self.get_u64("id"),
            },

            "settings.applyToCurrentTab" => ParsedEvent::SettingsApplyToCurrentTab,

            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
                params: self.params.clone(),
            },
        }
    }

    /// Gets a string from params.
    #[inline]
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Gets an optional string from params.
    #[inline]
    fn get_optional_string(&self, key: &str) -> Option<String> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Gets a u64 from params.
    #[inline]
    fn get_u64(&self, key: &str) -> u64 {
        self.params
            .get(key)
            .and_then(|v| v.as_u64())
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::rules::GroupColor;

    #[test]
    fn test_tab_updated_parsing() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "tabs.updated",
            "params": {
                "tabId": 12,
                "status": "complete",
                "url": "https://example.com",
                "title": "Example Domain"
            }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        assert_eq!(event.module(), "tabs");
        assert_eq!(event.event_name(), "updated");

        match event.parse() {
            ParsedEvent::TabUpdated {
                tab_id,
                status,
                url,
                title,
            } => {
                assert_eq!(tab_id, 12);
                assert_eq!(status, "complete");
                assert_eq!(url, "https://example.com");
                assert_eq!(title, Some("Example Domain".to_string()));
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_tab_updated_without_title() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "tabs.updated",
            "params": { "tabId": 12, "status": "loading", "url": "https://example.com" }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        match event.parse() {
            ParsedEvent::TabUpdated { title, status, .. } => {
                assert_eq!(title, None);
                assert_eq!(status, "loading");
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_settings_save_pattern_parsing() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "settings.savePattern",
            "params": {
                "pattern": {
                    "id": 1,
                    "pattern": "github",
                    "groupLabel": "git",
                    "useCapture": false,
                    "color": "blue",
                    "active": true
                }
            }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        match event.parse() {
            ParsedEvent::SettingsSavePattern { pattern } => {
                let rule: Rule = serde_json::from_value(pattern).expect("rule");
                assert_eq!(rule.group_label, "git");
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_settings_delete_pattern_parsing() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "settings.deletePattern",
            "params": { "id": 1718901234567 }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        match event.parse() {
            ParsedEvent::SettingsDeletePattern { id } => assert_eq!(id, 1_718_901_234_567),
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "custom.unknownEvent",
            "params": { "foo": "bar" }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        match event.parse() {
            ParsedEvent::Unknown { method, .. } => {
                assert_eq!(method, "custom.unknownEvent");
            }
            other => panic!("expected Unknown variant, got {other:?}"),
        }
    }

    #[test]
    fn test_event_reply_matched() {
        let id = RequestId::generate();
        let reply = EventReply::matched(id, true);
        let json = serde_json::to_string(&reply).expect("serialize");

        assert!(json.contains("replyTo"));
        assert!(json.contains("settings.applyToCurrentTab"));
        assert!(json.contains(r#""matched":true"#));
    }

    #[test]
    fn test_event_reply_patterns() {
        let id = RequestId::generate();
        let rules = vec![Rule::new("github", "git", GroupColor::Blue)];
        let reply = EventReply::patterns(id, &rules);
        let json = serde_json::to_string(&reply).expect("serialize");

        assert!(json.contains(r#""patterns""#));
        assert!(json.contains(r#""groupLabel":"git""#));
    }

    #[test]
    fn test_event_reply_failure() {
        let id = RequestId::generate();
        let reply = EventReply::failure(id, "settings.savePattern", "pattern must not be empty");
        let json = serde_json::to_string(&reply).expect("serialize");

        assert!(json.contains(r#""success":false"#));
        assert!(json.contains("pattern must not be empty"));
    }
}
