//! # Chat Handlers
//!
//! WebSocket entry point for the global chat room.

// region: --- Modules
pub mod socket;
// endregion: --- Modules

// region: --- Re-exports
pub use socket::chat_websocket;
// endregion: --- Re-exports
