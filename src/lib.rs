//! tabherd - Regex-driven browser tab grouping.
//!
//! This library watches tab navigation in a host browser and sorts
//! matching tabs into named, colored tab groups, driven by an ordered
//! list of user-defined regular-expression rules.
//!
//! # Architecture
//!
//! The organizer follows a client-server model:
//!
//! - **Local End (Rust)**: Evaluates rules, sends tab/group commands,
//!   receives events via WebSocket
//! - **Remote End (Extension)**: Executes commands in the browser,
//!   forwards tab lifecycle events and settings requests
//!
//! Key design principles:
//!
//! - Rules evaluate in stored order; the first matching active rule
//!   wins and shadows later ones
//! - The URL pass runs before the title pass
//! - Placement is idempotent per window: same-titled groups are reused,
//!   never duplicated, and an existing group's color is never touched
//! - Rule mutations persist write-ahead: the store accepts the new list
//!   before evaluations can see it
//!
//! # Quick Start
//!
//! ```no_run
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::sync::Arc;
//!
//! use tabherd::host::RemoteHost;
//! use tabherd::rules::{GroupColor, Rule, RuleSet};
//! use tabherd::storage::JsonFileStore;
//! use tabherd::transport::PendingServer;
//! use tabherd::{Organizer, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Wait for the companion extension to connect
//!     let server = PendingServer::bind(IpAddr::V4(Ipv4Addr::LOCALHOST), 8917).await?;
//!     let (connection, _ready) = server.accept().await?;
//!
//!     // Load persisted rules and wire up the organizer
//!     let store = Arc::new(JsonFileStore::new("rules.json"));
//!     let rules = RuleSet::load(store).await?;
//!     let host = Arc::new(RemoteHost::new(connection.clone()));
//!     let organizer = Organizer::new(rules, host);
//!
//!     // Add a rule: github.com/<owner>/... tabs group under <owner>
//!     organizer
//!         .save_pattern(
//!             Rule::new("github\\.com/([^/]+)", "git", GroupColor::Blue).with_capture(),
//!         )
//!         .await?;
//!
//!     // React to navigation and settings requests until disconnect
//!     organizer.run(connection).await
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`engine`] | Rule evaluation and tab placement |
//! | [`rules`] | [`Rule`], [`GroupColor`], [`RuleSet`] |
//! | [`host`] | Host browser contract and bridge implementation |
//! | [`storage`] | Rule persistence |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | WebSocket message types (internal) |
//! | [`transport`] | WebSocket transport layer (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Rule evaluation and tab placement.
///
/// This module contains the matching engine:
///
/// - [`Matcher`] - Ordered two-pass rule evaluation
/// - [`Grouper`] - Lookup-or-create group placement
pub mod engine;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Host browser contract.
///
/// The [`TabHost`] trait is the seam between the engine and the
/// browser; [`RemoteHost`] implements it over the WebSocket bridge.
pub mod host;

/// Type-safe identifiers for browser and rule entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// The organizer event loop and control surface.
pub mod organizer;

/// WebSocket protocol message types.
///
/// Internal module defining command/response/event structures.
pub mod protocol;

/// Grouping rules: data model and ordered collection.
pub mod rules;

/// Rule persistence.
pub mod storage;

/// WebSocket transport layer.
///
/// Internal module handling the WebSocket server and connection
/// management.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Engine types
pub use engine::{Grouper, MatchDecision, Matcher, match_rules};

// Organizer
pub use organizer::Organizer;

// Rule types
pub use rules::{GroupColor, Rule, RuleSet};

// Host types
pub use host::{ActiveTab, RemoteHost, TabGroupInfo, TabHost};

// Storage types
pub use storage::{JsonFileStore, MemoryStore, RuleStore};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{GroupId, RequestId, RuleId, SessionId, TabId, WindowId};
