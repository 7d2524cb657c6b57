//! scripture-chat Common Library
//!
//! Shared code for the scripture-chat gateway including:
//! - Chat request/response types, answer accumulation and history
//! - Source-citation extraction from streamed answers
//! - Knowledge-service client abstraction
//! - Theme registry for the selectable domains
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod chat;
pub mod citations;
pub mod config;
pub mod errors;
pub mod knowledge;
pub mod metrics;
pub mod themes;

// Re-export commonly used types
pub use chat::{AnswerAccumulator, ChatHistory, ChatMessage, ChatQuestionRequest, ResponseMode};
pub use citations::{parse_sources, ParsedAnswer, SourceCitation};
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use knowledge::KnowledgeService;
pub use themes::Theme;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of the ask endpoint on the knowledge service
pub const KNOWLEDGE_ASK_PATH: &str = "/api/ask";
