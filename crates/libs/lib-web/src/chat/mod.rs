//! # Chat Module
//!
//! Real-time message router for the global forum room.
//!
//! Clients connect over WebSocket and send plain text. Plain chat is relayed
//! to everyone. Text starting with `/help` is a question for the assistant:
//! the answer is generated, titled, stored as forum history and then relayed
//! to everyone. Failed commands are reported to their sender only.

pub mod broadcast;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod session;
pub mod state;
pub mod store;

pub use broadcast::BroadcastEngine;
pub use command::Inbound;
pub use dispatcher::{CommandDispatcher, DispatchOutcome};
pub use error::ChatError;
pub use gateway::{AssistantGateway, GatewayError};
pub use handlers::chat_websocket;
pub use session::{Session, SessionId, SessionRegistry};
pub use state::ChatAppState;
pub use store::{QuestionStore, SqliteQuestionStore, StoreError};
