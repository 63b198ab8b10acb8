//! WebSocket transport layer.
//!
//! The transport owns the socket the companion extension connects to:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PendingServer`] | Bound server awaiting the extension |
//! | [`Connection`] | Established connection with event loop |
//! | [`ReadyData`] | READY handshake payload |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket server.
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ReadyData};
pub use server::PendingServer;
