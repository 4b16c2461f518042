//! # Chat State Management
//!
//! Wires the session registry, broadcast engine and dispatcher together for
//! the global room.

use std::sync::Arc;

use lib_core::{Config, DbPool};

use super::broadcast::BroadcastEngine;
use super::dispatcher::CommandDispatcher;
use super::gateway::{gateway_from_config, AssistantGateway};
use super::session::SessionRegistry;
use super::store::{QuestionStore, SqliteQuestionStore};

/// Application state for the chat module.
pub struct ChatAppState {
    pub registry: Arc<SessionRegistry>,
    pub dispatcher: Arc<CommandDispatcher>,
}

impl ChatAppState {
    /// Build the room from explicit collaborators.
    pub fn new(gateway: Option<Arc<dyn AssistantGateway>>, store: Arc<dyn QuestionStore>) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let broadcaster = BroadcastEngine::new(Arc::clone(&registry));
        let dispatcher = Arc::new(CommandDispatcher::new(gateway, store, broadcaster));
        Self { registry, dispatcher }
    }

    /// Build the room with the Gemini gateway (when configured) and the SQLite store.
    pub fn from_config(db: DbPool, config: &Config) -> Self {
        Self::new(gateway_from_config(config), Arc::new(SqliteQuestionStore::new(db)))
    }
}
