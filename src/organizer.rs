//! The organizer: event loop and control surface.
//!
//! An [`Organizer`] owns the rule set and the host handle, reacts to
//! tab navigation events, and answers settings-surface requests. It is
//! the single writer of the rule list; evaluations read atomic
//! snapshots of it.
//!
//! # Example
//!
//! ```no_run
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::sync::Arc;
//!
//! use tabherd::host::RemoteHost;
//! use tabherd::rules::RuleSet;
//! use tabherd::storage::JsonFileStore;
//! use tabherd::transport::PendingServer;
//! use tabherd::{Organizer, Result};
//!
//! # async fn example() -> Result<()> {
//! let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 8917).await?;
//! let (connection, _ready) = server.accept().await?;
//!
//! let store = Arc::new(JsonFileStore::new("rules.json"));
//! let rules = RuleSet::load(store).await?;
//! let host = Arc::new(RemoteHost::new(connection.clone()));
//!
//! let organizer = Organizer::new(rules, host);
//! organizer.run(connection).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::engine::Matcher;
use crate::error::{Error, Result};
use crate::host::TabHost;
use crate::identifiers::{RuleId, TabId};
use crate::protocol::{Event, EventReply, ParsedEvent};
use crate::rules::{Rule, RuleSet};
use crate::transport::Connection;

// ============================================================================
// Constants
// ============================================================================

/// URL schemes the organizer never evaluates.
///
/// Browser-internal and extension pages must not be regrouped.
const PRIVILEGED_SCHEMES: [&str; 5] = [
    "about",
    "chrome",
    "chrome-extension",
    "moz-extension",
    "devtools",
];

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for an organizer.
struct OrganizerInner {
    /// Ordered rules, mirrored to the store.
    rules: RuleSet,
    /// Host browser handle.
    host: Arc<dyn TabHost>,
    /// Rule evaluation and placement.
    matcher: Matcher,
}

// ============================================================================
// Organizer
// ============================================================================

/// Watches tab navigation and sorts matching tabs into groups.
///
/// Cloning an organizer is cheap; clones share the same rule set and
/// host.
#[derive(Clone)]
pub struct Organizer {
    /// Shared inner state.
    inner: Arc<OrganizerInner>,
}

impl fmt::Debug for Organizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Organizer")
            .field("rules", &self.inner.rules)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Organizer - Constructor
// ============================================================================

impl Organizer {
    /// Creates an organizer over a loaded rule set and a host.
    #[must_use]
    pub fn new(rules: RuleSet, host: Arc<dyn TabHost>) -> Self {
        Self {
            inner: Arc::new(OrganizerInner {
                rules,
                matcher: Matcher::new(Arc::clone(&host)),
                host,
            }),
        }
    }
}

// ============================================================================
// Organizer - Control Surface
// ============================================================================

impl Organizer {
    /// Returns the full rule list in stored order.
    #[must_use]
    pub fn get_patterns(&self) -> Vec<Rule> {
        self.inner.rules.snapshot()
    }

    /// Validates and saves a rule (create or update), persisting the
    /// mutated list before it becomes visible to evaluations.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] / [`Error::InvalidPattern`] for a rule
    ///   that is incomplete or does not compile
    /// - [`Error::Persistence`] if the store rejects the write
    pub async fn save_pattern(&self, rule: Rule) -> Result<Rule> {
        rule.validate()?;
        let saved = self.inner.rules.save(rule).await?;
        info!(rule_id = %saved.id, pattern = %saved.pattern, "Pattern saved");
        Ok(saved)
    }

    /// Deletes a rule by ID.
    ///
    /// # Errors
    ///
    /// - [`Error::RuleNotFound`] if the ID is unknown
    /// - [`Error::Persistence`] if the store rejects the write
    pub async fn delete_pattern(&self, id: RuleId) -> Result<()> {
        self.inner.rules.remove(id).await?;
        info!(rule_id = %id, "Pattern deleted");
        Ok(())
    }

    /// Evaluates the rules against the active tab and groups it on a
    /// match.
    ///
    /// Returns `Ok(false)` when no tab is focused, the tab has no URL,
    /// or no rule matches; a non-match has no side effects.
    ///
    /// # Errors
    ///
    /// Propagates host failures from the placement.
    pub async fn apply_to_current_tab(&self) -> Result<bool> {
        let Some(active) = self.inner.host.active_tab().await? else {
            debug!("No active tab");
            return Ok(false);
        };

        if active.url.is_empty() {
            return Ok(false);
        }

        self.evaluate(active.tab_id, &active.url, active.title.as_deref())
            .await
    }

    /// Evaluates the rules against a tab's URL and title.
    async fn evaluate(&self, tab_id: TabId, url: &str, title: Option<&str>) -> Result<bool> {
        let rules = self.inner.rules.snapshot();
        self.inner.matcher.evaluate(&rules, url, title, tab_id).await
    }
}

// ============================================================================
// Organizer - Event Loop
// ============================================================================

impl Organizer {
    /// Drains the connection's event stream until it closes.
    ///
    /// Each event is handled to completion before the next one is
    /// taken; settings requests are answered on the same connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the connection's event stream was
    /// already taken.
    pub async fn run(&self, connection: Connection) -> Result<()> {
        let mut events = connection
            .take_events()
            .ok_or_else(|| Error::protocol("Event stream already taken"))?;

        info!("Organizer running");

        while let Some(event) = events.recv().await {
            if let Some(reply) = self.handle_event(event).await
                && let Err(e) = connection.reply(reply)
            {
                warn!(error = %e, "Failed to send reply");
            }
        }

        info!("Event stream closed, organizer stopping");
        Ok(())
    }

    /// Handles one event, returning the reply to send, if any.
    async fn handle_event(&self, event: Event) -> Option<EventReply> {
        let id = event.id;

        match event.parse() {
            ParsedEvent::TabUpdated {
                tab_id,
                status,
                url,
                title,
            } => {
                self.on_tab_updated(tab_id, &status, &url, title.as_deref())
                    .await;
                None
            }

            ParsedEvent::SettingsGetPatterns => {
                Some(EventReply::patterns(id, &self.get_patterns()))
            }

            ParsedEvent::SettingsSavePattern { pattern } => {
                let rule: Rule = match serde_json::from_value(pattern) {
                    Ok(rule) => rule,
                    Err(e) => {
                        return Some(EventReply::failure(
                            id,
                            "settings.savePattern",
                            format!("malformed pattern: {e}"),
                        ));
                    }
                };

                Some(match self.save_pattern(rule).await {
                    Ok(saved) => EventReply::saved(id, &saved),
                    Err(e) => EventReply::failure(id, "settings.savePattern", e.to_string()),
                })
            }

            ParsedEvent::SettingsDeletePattern { id: rule_id } => {
                Some(match self.delete_pattern(RuleId::new(rule_id)).await {
                    Ok(()) => EventReply::deleted(id),
                    Err(e) => EventReply::failure(id, "settings.deletePattern", e.to_string()),
                })
            }

            ParsedEvent::SettingsApplyToCurrentTab => {
                // The reply channel stays open until the evaluation
                // resolves, matched or not.
                Some(match self.apply_to_current_tab().await {
                    Ok(matched) => EventReply::matched(id, matched),
                    Err(e) => EventReply::failure(id, "settings.applyToCurrentTab", e.to_string()),
                })
            }

            ParsedEvent::Unknown { method, .. } => {
                debug!(method = %method, "Ignoring unknown event");
                None
            }
        }
    }

    /// Reacts to a tab load-state change.
    ///
    /// Only completed loads of non-privileged URLs are evaluated.
    /// Placement failures are logged and dropped; the next navigation
    /// re-evaluates independently.
    async fn on_tab_updated(&self, tab_id: u32, status: &str, url: &str, title: Option<&str>) {
        if status != "complete" || url.is_empty() {
            return;
        }

        if is_privileged(url) {
            debug!(url = %url, "Skipping privileged URL");
            return;
        }

        let Some(tab_id) = TabId::new(tab_id) else {
            warn!("Tab update without a valid tab ID");
            return;
        };

        match self.evaluate(tab_id, url, title).await {
            Ok(matched) => {
                debug!(tab_id = %tab_id, matched, "Navigation evaluated");
            }
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "Placement failed");
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` for browser-internal and extension URLs.
fn is_privileged(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => PRIVILEGED_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::host::ActiveTab;
    use crate::host::fake::FakeHost;
    use crate::identifiers::WindowId;
    use crate::rules::GroupColor;
    use crate::storage::{MemoryStore, RuleStore};

    async fn organizer_with(host: Arc<FakeHost>) -> Organizer {
        let rules = RuleSet::load(Arc::new(MemoryStore::new()))
            .await
            .expect("load");
        Organizer::new(rules, host as Arc<dyn TabHost>)
    }

    fn tab(raw: u32) -> TabId {
        TabId::new(raw).expect("valid tab id")
    }

    fn event(method: &str, params: serde_json::Value) -> Event {
        serde_json::from_value(json!({
            "id": "11111111-1111-1111-1111-111111111111",
            "type": "event",
            "method": method,
            "params": params
        }))
        .expect("event")
    }

    #[test]
    fn test_is_privileged() {
        assert!(is_privileged("about:config"));
        assert!(is_privileged("chrome://settings"));
        assert!(is_privileged("chrome-extension://abc/popup.html"));
        assert!(is_privileged("moz-extension://abc/popup.html"));
        assert!(!is_privileged("https://example.com"));
        assert!(!is_privileged("not a url"));
    }

    #[tokio::test]
    async fn test_save_pattern_rejects_invalid_regex() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;

        let err = organizer
            .save_pattern(Rule::new("(bad[", "oops", GroupColor::Blue))
            .await
            .unwrap_err();
        assert!(err.is_rejection());
        assert!(organizer.get_patterns().is_empty());
    }

    #[tokio::test]
    async fn test_save_pattern_persists() {
        let store = Arc::new(MemoryStore::new());
        let rules = RuleSet::load(Arc::clone(&store) as Arc<dyn RuleStore>)
            .await
            .expect("load");
        let organizer = Organizer::new(rules, Arc::new(FakeHost::new()) as Arc<dyn TabHost>);

        let saved = organizer
            .save_pattern(Rule::new("github", "git", GroupColor::Blue))
            .await
            .expect("save");

        assert_eq!(organizer.get_patterns(), vec![saved.clone()]);
        assert_eq!(store.load().await.expect("load"), vec![saved]);
    }

    #[tokio::test]
    async fn test_delete_pattern_unknown_id() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;

        let err = organizer.delete_pattern(RuleId::new(404)).await.unwrap_err();
        assert!(matches!(err, Error::RuleNotFound { .. }));
    }

    #[tokio::test]
    async fn test_apply_to_current_tab_no_active_tab() {
        let host = Arc::new(FakeHost::new());
        let organizer = organizer_with(Arc::clone(&host)).await;

        let matched = organizer.apply_to_current_tab().await.expect("apply");
        assert!(!matched);
    }

    #[tokio::test]
    async fn test_apply_to_current_tab_no_match_no_mutation() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(5), WindowId::new(1));
        host.set_active(ActiveTab {
            tab_id: tab(5),
            url: "https://example.com".to_string(),
            title: Some("Example".to_string()),
        });

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(Rule::new("github", "git", GroupColor::Blue))
            .await
            .expect("save");

        let matched = organizer.apply_to_current_tab().await.expect("apply");
        assert!(!matched);
        assert_eq!(host.created_count(), 0);
    }

    #[tokio::test]
    async fn test_apply_to_current_tab_groups_on_match() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(5), WindowId::new(1));
        host.set_active(ActiveTab {
            tab_id: tab(5),
            url: "https://github.com/acme/repo".to_string(),
            title: None,
        });

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(
                Rule::new("github\\.com/([^/]+)", "git", GroupColor::Blue).with_capture(),
            )
            .await
            .expect("save");

        let matched = organizer.apply_to_current_tab().await.expect("apply");
        assert!(matched);

        let groups = host.groups_in(WindowId::new(1));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, "acme");
        assert_eq!(groups[0].color, GroupColor::Blue);
    }

    #[tokio::test]
    async fn test_completed_navigation_groups_tab() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(9), WindowId::new(2));

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(Rule::new("docs\\.rs", "rust", GroupColor::Green))
            .await
            .expect("save");

        let reply = organizer
            .handle_event(event(
                "tabs.updated",
                json!({ "tabId": 9, "status": "complete", "url": "https://docs.rs/regex" }),
            ))
            .await;

        assert!(reply.is_none());
        assert_eq!(host.groups_in(WindowId::new(2)).len(), 1);
        assert_eq!(host.groups_in(WindowId::new(2))[0].title, "rust");
    }

    #[tokio::test]
    async fn test_loading_navigation_ignored() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(9), WindowId::new(2));

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(Rule::new("docs\\.rs", "rust", GroupColor::Green))
            .await
            .expect("save");

        organizer
            .handle_event(event(
                "tabs.updated",
                json!({ "tabId": 9, "status": "loading", "url": "https://docs.rs/regex" }),
            ))
            .await;

        assert_eq!(host.created_count(), 0);
    }

    #[tokio::test]
    async fn test_privileged_url_ignored() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(9), WindowId::new(2));

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(Rule::new(".*", "everything", GroupColor::Red))
            .await
            .expect("save");

        organizer
            .handle_event(event(
                "tabs.updated",
                json!({ "tabId": 9, "status": "complete", "url": "about:config" }),
            ))
            .await;

        assert_eq!(host.created_count(), 0);
    }

    #[tokio::test]
    async fn test_title_matches_when_url_does_not() {
        let host = Arc::new(FakeHost::new());
        host.insert_tab(tab(9), WindowId::new(2));

        let organizer = organizer_with(Arc::clone(&host)).await;
        organizer
            .save_pattern(Rule::new("Issue Tracker", "work", GroupColor::Yellow))
            .await
            .expect("save");

        organizer
            .handle_event(event(
                "tabs.updated",
                json!({
                    "tabId": 9,
                    "status": "complete",
                    "url": "https://internal.example.com/x",
                    "title": "Issue Tracker - Home"
                }),
            ))
            .await;

        assert_eq!(host.groups_in(WindowId::new(2))[0].title, "work");
    }

    #[tokio::test]
    async fn test_get_patterns_event_reply() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;
        organizer
            .save_pattern(Rule::new("github", "git", GroupColor::Blue))
            .await
            .expect("save");

        let reply = organizer
            .handle_event(event("settings.getPatterns", json!({})))
            .await
            .expect("reply");

        assert_eq!(reply.reply_to, "settings.getPatterns");
        let patterns = reply.result.get("patterns").expect("patterns");
        assert_eq!(patterns.as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn test_save_pattern_event_roundtrip() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;

        let reply = organizer
            .handle_event(event(
                "settings.savePattern",
                json!({
                    "pattern": {
                        "pattern": "github",
                        "groupLabel": "git",
                        "useCapture": false,
                        "color": "blue",
                        "active": true
                    }
                }),
            ))
            .await
            .expect("reply");

        assert_eq!(reply.result.get("success"), Some(&json!(true)));
        assert_eq!(organizer.get_patterns().len(), 1);
    }

    #[tokio::test]
    async fn test_save_pattern_event_rejects_bad_rule() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;

        let reply = organizer
            .handle_event(event(
                "settings.savePattern",
                json!({
                    "pattern": {
                        "pattern": "(bad[",
                        "groupLabel": "oops",
                        "useCapture": false,
                        "color": "blue",
                        "active": true
                    }
                }),
            ))
            .await
            .expect("reply");

        assert_eq!(reply.result.get("success"), Some(&json!(false)));
        assert!(organizer.get_patterns().is_empty());
    }

    #[tokio::test]
    async fn test_delete_pattern_event() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;
        let saved = organizer
            .save_pattern(Rule::new("github", "git", GroupColor::Blue))
            .await
            .expect("save");

        let reply = organizer
            .handle_event(event(
                "settings.deletePattern",
                json!({ "id": saved.id.get() }),
            ))
            .await
            .expect("reply");

        assert_eq!(reply.result.get("success"), Some(&json!(true)));
        assert!(organizer.get_patterns().is_empty());
    }

    #[tokio::test]
    async fn test_apply_event_reports_matched_false() {
        let organizer = organizer_with(Arc::new(FakeHost::new())).await;

        let reply = organizer
            .handle_event(event("settings.applyToCurrentTab", json!({})))
            .await
            .expect("reply");

        assert_eq!(reply.result.get("matched"), Some(&json!(false)));
    }
}
