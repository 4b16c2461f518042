//! # Assistant Gateway
//!
//! Text generation behind a trait so the dispatcher never sees the provider.
//!
//! The production implementation talks to Google Gemini through rust-genai.
//! Answers and titles are two separate calls: a failed answer never requests
//! a title, and a failed title never discards an answer.

use std::sync::Arc;

use async_trait::async_trait;
use lib_core::Config;
use thiserror::Error;

/// Failure of a single assistant call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("assistant request failed: {0}")]
    Request(String),

    #[error("assistant returned an empty response")]
    EmptyResponse,
}

/// Text generation operations consumed by the command dispatcher.
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Answer a free-text question.
    async fn generate_answer(&self, query: &str) -> Result<String, GatewayError>;

    /// Produce a short title from a templated prompt.
    async fn generate_title(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Build the configured gateway, or `None` when no API key is available.
pub fn gateway_from_config(config: &Config) -> Option<Arc<dyn AssistantGateway>> {
    let Some(api_key) = config.gemini_api_key.clone() else {
        tracing::warn!("GEMINI_API_KEY not set - /help commands will report a configuration error");
        return None;
    };
    build_gateway(api_key, config.gemini_model.clone())
}

#[cfg(feature = "genai")]
fn build_gateway(api_key: String, model: String) -> Option<Arc<dyn AssistantGateway>> {
    tracing::info!("🤖 Assistant gateway ready (provider: Gemini, model: {})", model);
    Some(Arc::new(GeminiGateway::new(api_key, model)))
}

#[cfg(not(feature = "genai"))]
fn build_gateway(_api_key: String, _model: String) -> Option<Arc<dyn AssistantGateway>> {
    tracing::warn!("AI chat is not enabled. Rebuild with the 'genai' feature to answer /help commands.");
    None
}

/// Gemini-backed gateway.
#[cfg(feature = "genai")]
pub struct GeminiGateway {
    client: genai::Client,
    model: String,
}

#[cfg(feature = "genai")]
impl GeminiGateway {
    pub fn new(api_key: String, model: String) -> Self {
        use genai::resolver::{AuthData, AuthResolver};

        // Build auth resolver for the configured API key
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        let client = genai::Client::builder()
            .with_auth_resolver(auth_resolver)
            .build();

        Self { client, model }
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        use genai::chat::{ChatMessage, ChatRequest};

        let chat_req = ChatRequest::default().append_message(ChatMessage::user(prompt));

        tracing::debug!("🤖 Calling AI API with model: {}", self.model);
        let chat_res = self
            .client
            .exec_chat(&self.model, chat_req, None)
            .await
            .map_err(|e| GatewayError::Request(format!("{:?}", e)))?;

        let text = chat_res
            .first_text()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(feature = "genai")]
#[async_trait]
impl AssistantGateway for GeminiGateway {
    async fn generate_answer(&self, query: &str) -> Result<String, GatewayError> {
        self.complete(query).await
    }

    async fn generate_title(&self, prompt: &str) -> Result<String, GatewayError> {
        self.complete(prompt).await
    }
}
