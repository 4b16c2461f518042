//! Failures of the per-message dispatch pipeline.

use thiserror::Error;

use super::command::{NOTICE_GENERATION_FAILED, NOTICE_NOT_CONFIGURED, NOTICE_PROCESSING_ERROR};
use super::gateway::GatewayError;
use super::store::StoreError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("assistant gateway is not configured")]
    GatewayNotConfigured,

    #[error("assistant call failed: {0}")]
    GatewayCallFailed(#[from] GatewayError),

    #[error("question store write failed: {0}")]
    StoreWriteFailed(#[from] StoreError),

    #[error("unexpected dispatch failure: {0}")]
    UnexpectedDispatchFailure(String),
}

impl ChatError {
    /// The fixed notice sent to the session that triggered the failure.
    pub fn sender_notice(&self) -> &'static str {
        match self {
            ChatError::GatewayNotConfigured => NOTICE_NOT_CONFIGURED,
            ChatError::GatewayCallFailed(_) => NOTICE_GENERATION_FAILED,
            ChatError::StoreWriteFailed(_) | ChatError::UnexpectedDispatchFailure(_) => {
                NOTICE_PROCESSING_ERROR
            }
        }
    }
}
