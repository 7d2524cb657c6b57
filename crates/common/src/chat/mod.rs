//! Chat request and message types
//!
//! Provides:
//! - The question payload accepted by the relay and forwarded upstream
//! - Streaming answer accumulation ([`AnswerAccumulator`])
//! - Bounded chat history ([`ChatHistory`])

mod accumulator;
mod history;

pub use accumulator::{AnswerAccumulator, EMPTY_ANSWER_FALLBACK, ERROR_FALLBACK};
pub use history::{ChatHistory, MAX_HISTORY_MESSAGES};

use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Response depth requested from the knowledge service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Quick,
    #[default]
    Detailed,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Quick => "quick",
            ResponseMode::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Question posted to `/api/chat` and forwarded as-is to the knowledge
/// service's ask endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatQuestionRequest {
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,

    /// Defaults to detailed when omitted or null
    #[serde(default, deserialize_with = "mode_or_default")]
    pub mode: ResponseMode,
}

fn mode_or_default<'de, D>(deserializer: D) -> std::result::Result<ResponseMode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<ResponseMode>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChatQuestionRequest {
    pub fn new(question: impl Into<String>, mode: ResponseMode) -> Self {
        Self {
            question: question.into(),
            mode,
        }
    }

    /// Parse a raw request body. The body must be a JSON object with a
    /// string `question`; the content type is not checked.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| AppError::InvalidFormat {
                message: format!("request body is not valid JSON: {}", e),
            })?;

        match value.get("question") {
            None | Some(serde_json::Value::Null) => {
                return Err(AppError::MissingField {
                    field: "question".to_string(),
                })
            }
            Some(q) if !q.is_string() => {
                return Err(AppError::Validation {
                    message: "question must be a string".to_string(),
                    field: Some("question".to_string()),
                })
            }
            Some(_) => {}
        }

        serde_json::from_value(value).map_err(|e| AppError::InvalidFormat {
            message: e.to_string(),
        })
    }

    /// Check the question against the non-empty rule and a length ceiling
    pub fn validate_question(&self, max_chars: usize) -> Result<()> {
        self.validate().map_err(|e| AppError::Validation {
            message: e.to_string(),
            field: Some("question".to_string()),
        })?;

        let chars = self.question.chars().count();
        if chars > max_chars {
            return Err(AppError::Validation {
                message: format!("question is {} characters, limit is {}", chars, max_chars),
                field: Some("question".to_string()),
            });
        }

        Ok(())
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}
