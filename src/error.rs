//! Error types for the tab organizer.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use tabherd::{Result, Error};
//!
//! async fn example(organizer: &Organizer) -> Result<()> {
//!     let matched = organizer.apply_to_current_tab().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Rules | [`Error::InvalidPattern`], [`Error::Validation`], [`Error::RuleNotFound`] |
//! | Persistence | [`Error::Persistence`], [`Error::Io`], [`Error::Json`] |
//! | Host | [`Error::TabNotFound`], [`Error::HostOperation`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionTimeout`], [`Error::ConnectionClosed`] |
//! | Protocol | [`Error::Protocol`], [`Error::RequestTimeout`], [`Error::WebSocket`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::{RequestId, RuleId, TabId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Rule Errors
    // ========================================================================
    /// A rule's regular expression failed to compile.
    ///
    /// At evaluation time this is recovered locally (the rule is skipped
    /// for that pass); at save time it rejects the rule.
    #[error("Invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        /// The offending regex source.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// A user-supplied rule is missing required fields.
    ///
    /// Rejected before reaching the rule set.
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// No rule exists with the given ID.
    #[error("Rule not found: {rule_id}")]
    RuleNotFound {
        /// The missing rule ID.
        rule_id: RuleId,
    },

    // ========================================================================
    // Persistence Errors
    // ========================================================================
    /// Writing or reading the rule store failed.
    ///
    /// Surfaced to the caller of the mutating operation; the in-memory
    /// rule list keeps its pre-mutation state.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Description of the storage failure.
        message: String,
    },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The host no longer knows the tab (closed mid-operation).
    #[error("Tab not found: {tab_id}")]
    TabNotFound {
        /// The missing tab ID.
        tab_id: TabId,
    },

    /// A tab/group operation failed on the host side.
    ///
    /// Placement is not retried; the next qualifying event re-evaluates
    /// independently.
    #[error("Host operation failed: {message}")]
    HostOperation {
        /// Error reported by the host.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Connection timeout waiting for the extension.
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// WebSocket connection closed unexpectedly.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected response.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    /// Command request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid pattern error.
    #[inline]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a rule not found error.
    #[inline]
    pub fn rule_not_found(rule_id: RuleId) -> Self {
        Self::RuleNotFound { rule_id }
    }

    /// Creates a persistence error.
    #[inline]
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Creates a tab not found error.
    #[inline]
    pub fn tab_not_found(tab_id: TabId) -> Self {
        Self::TabNotFound { tab_id }
    }

    /// Creates a host operation error.
    #[inline]
    pub fn host_operation(message: impl Into<String>) -> Self {
        Self::HostOperation {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a connection timeout error.
    #[inline]
    pub fn connection_timeout(timeout_ms: u64) -> Self {
        Self::ConnectionTimeout { timeout_ms }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a rule rejection (bad pattern or
    /// missing fields) the settings surface should show to the user.
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::Validation { .. } | Self::RuleNotFound { .. }
        )
    }

    /// Returns `true` if this is a host-side placement failure.
    #[inline]
    #[must_use]
    pub fn is_host_error(&self) -> bool {
        matches!(self, Self::TabNotFound { .. } | Self::HostOperation { .. })
    }

    /// Returns `true` if this is a connection error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. }
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
                | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout { .. } | Self::RequestTimeout { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
