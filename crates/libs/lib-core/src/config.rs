//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! The assistant and the detection service are optional: leaving their API keys
//! unset keeps the server running, and the features that need them report a
//! configuration error to the caller instead.

use lib_utils::envs::{get_env_opt, get_env_or, get_env_parse_or};

/// Default Gemini model used for answers and titles.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default hosted inference endpoint.
pub const DEFAULT_ROBOFLOW_API_URL: &str = "https://detect.roboflow.com";

/// Default eye disease detection model.
pub const DEFAULT_ROBOFLOW_MODEL_ID: &str = "eye-disease-svz00/6";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Gemini API key; `None` means the assistant is not configured
    pub gemini_api_key: Option<String>,

    /// Gemini model name
    pub gemini_model: String,

    /// Hosted inference API key; `None` disables `/detect`
    pub roboflow_api_key: Option<String>,

    /// Hosted inference base URL
    pub roboflow_api_url: String,

    /// Detection model identifier (`project/version`)
    pub roboflow_model_id: String,

    /// Maximum number of records returned by the question history endpoint
    ///
    /// Valid range: 1-500
    pub question_history_limit: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/health_forum.db");

        let question_history_limit = get_env_parse_or("QUESTION_HISTORY_LIMIT", 50i64)
            .map_err(|e| format!("QUESTION_HISTORY_LIMIT must be a valid number: {}", e))?;

        Ok(Self {
            database_url,
            gemini_api_key: get_env_opt("GEMINI_API_KEY"),
            gemini_model: get_env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            roboflow_api_key: get_env_opt("ROBOFLOW_API_KEY"),
            roboflow_api_url: get_env_or("ROBOFLOW_API_URL", DEFAULT_ROBOFLOW_API_URL),
            roboflow_model_id: get_env_or("ROBOFLOW_MODEL_ID", DEFAULT_ROBOFLOW_MODEL_ID),
            question_history_limit,
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.database_url.starts_with("sqlite:") {
            return Err("DATABASE_URL must be a sqlite: URL".to_string());
        }

        if self.question_history_limit < 1 || self.question_history_limit > 500 {
            return Err("QUESTION_HISTORY_LIMIT must be between 1 and 500".to_string());
        }

        if self.roboflow_model_id.split('/').count() != 2 {
            return Err("ROBOFLOW_MODEL_ID must look like <project>/<version>".to_string());
        }

        Ok(())
    }

    /// Whether an assistant API key is available.
    pub fn assistant_configured(&self) -> bool {
        self.gemini_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            roboflow_api_key: None,
            roboflow_api_url: DEFAULT_ROBOFLOW_API_URL.to_string(),
            roboflow_model_id: DEFAULT_ROBOFLOW_MODEL_ID.to_string(),
            question_history_limit: 50,
        }
    }
}
