//! # Command Dispatcher
//!
//! Per-message state machine of the chat room.
//!
//! ```text
//! Received → Chat    → broadcast to all                          (Relayed)
//!          → Command → gateway configured?  no → notify sender   (SenderNotified)
//!                    → answer               err → notify sender  (SenderNotified)
//!                    → title                err → fallback title
//!                    → append record        err → log
//!                    → broadcast answer to all                   (Answered)
//! ```
//!
//! Every inbound message ends in exactly one outcome. Errors and panics are
//! contained at the per-message boundary and surface to the sender as one of
//! the fixed notices; nobody else hears about a failed command.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use lib_core::model::store::models::QuestionRecord;
use tracing::{error, info, instrument, warn};

use super::broadcast::BroadcastEngine;
use super::command::{fallback_title, title_prompt, Inbound};
use super::error::ChatError;
use super::gateway::AssistantGateway;
use super::session::SessionId;
use super::store::QuestionStore;

/// Terminal state of one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Plain chat relayed to the room.
    Relayed { recipients: usize },
    /// Assistant answer broadcast to the room.
    Answered { recipients: usize, persisted: bool },
    /// Only the sender was told; nothing was broadcast.
    SenderNotified { notice: &'static str },
}

pub struct CommandDispatcher {
    gateway: Option<Arc<dyn AssistantGateway>>,
    store: Arc<dyn QuestionStore>,
    broadcaster: BroadcastEngine,
}

impl CommandDispatcher {
    pub fn new(
        gateway: Option<Arc<dyn AssistantGateway>>,
        store: Arc<dyn QuestionStore>,
        broadcaster: BroadcastEngine,
    ) -> Self {
        Self { gateway, store, broadcaster }
    }

    /// Entry point for connection tasks.
    ///
    /// Chat is relayed before returning, which keeps one sender's chat lines
    /// in order. Commands run on their own task so a slow assistant call
    /// never holds up the sender's connection or anyone else.
    pub async fn submit(self: &Arc<Self>, sender: SessionId, text: String) {
        match Inbound::classify(&text) {
            inbound @ Inbound::Chat(_) => {
                self.dispatch(sender, inbound).await;
            }
            inbound @ Inbound::Command(_) => {
                let dispatcher = Arc::clone(self);
                tokio::spawn(async move {
                    dispatcher.dispatch(sender, inbound).await;
                });
            }
        }
    }

    /// Classify and fully process one message.
    pub async fn handle(&self, sender: SessionId, text: &str) -> DispatchOutcome {
        self.dispatch(sender, Inbound::classify(text)).await
    }

    async fn dispatch(&self, sender: SessionId, inbound: Inbound) -> DispatchOutcome {
        let result = AssertUnwindSafe(self.process(sender, inbound))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(ChatError::UnexpectedDispatchFailure(panic_message(panic.as_ref())))
            });

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                match &err {
                    ChatError::GatewayNotConfigured => {
                        warn!(session_id = %sender, "assistant command received but no gateway is configured");
                    }
                    _ => error!(session_id = %sender, error = %err, "dispatch failed"),
                }
                let notice = err.sender_notice();
                self.broadcaster.reply_to(sender, notice).await;
                DispatchOutcome::SenderNotified { notice }
            }
        }
    }

    async fn process(&self, sender: SessionId, inbound: Inbound) -> Result<DispatchOutcome, ChatError> {
        match inbound {
            Inbound::Chat(text) => {
                let recipients = self.broadcaster.broadcast_all(&text).await;
                Ok(DispatchOutcome::Relayed { recipients })
            }
            Inbound::Command(query) => self.answer(sender, query).await,
        }
    }

    #[instrument(skip(self, query), fields(session_id = %sender, query_len = query.len()))]
    async fn answer(&self, sender: SessionId, query: String) -> Result<DispatchOutcome, ChatError> {
        let gateway = self.gateway.as_ref().ok_or(ChatError::GatewayNotConfigured)?;

        let answer = gateway.generate_answer(&query).await?;

        let title = match gateway.generate_title(&title_prompt(&query)).await {
            Ok(title) => title,
            Err(e) => {
                warn!(error = %e, "title generation failed, using fallback title");
                fallback_title(&query)
            }
        };

        let record = QuestionRecord::new(query, answer.clone(), title);
        let persisted = match self.store.append(record).await {
            Ok(()) => true,
            Err(e) => {
                // History loss never blocks the live answer
                error!(error = %ChatError::from(e), "question not persisted, broadcasting anyway");
                false
            }
        };

        let recipients = self.broadcaster.broadcast_all(&answer).await;
        info!(recipients, persisted, "assistant answer broadcast");

        Ok(DispatchOutcome::Answered { recipients, persisted })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
