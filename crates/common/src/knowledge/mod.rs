//! Knowledge service abstraction
//!
//! The knowledge service answers questions as a chunked text stream. This
//! module provides:
//! - The [`KnowledgeService`] trait the relay is written against
//! - An HTTP client for the real service
//! - A scripted mock for tests

use crate::chat::{AnswerAccumulator, ChatQuestionRequest};
use crate::citations::ParsedAnswer;
use crate::config::{AppConfig, KNOWLEDGE_SERVICE_URL_ENV};
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::KNOWLEDGE_ASK_PATH;
use async_trait::async_trait;
use axum::body::Bytes;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Answer bytes in arrival order
pub type AnswerStream = BoxStream<'static, Result<Bytes>>;

/// Upstream error bodies longer than this are cut before being forwarded
const MAX_UPSTREAM_ERROR_BODY: usize = 4096;

/// Upper bound on reading an upstream error body
const ERROR_BODY_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Trait for asking the knowledge service
#[async_trait]
pub trait KnowledgeService: Send + Sync {
    /// Send a question. Resolves once the service accepted it; the answer
    /// then arrives through the returned stream. Dropping the stream
    /// releases the upstream connection.
    async fn ask(&self, request: &ChatQuestionRequest) -> Result<AnswerStream>;

    /// Whether an upstream location is available at all
    fn is_configured(&self) -> bool;

    /// Short name for logs
    fn name(&self) -> &str;

    /// Ask and wait for the whole answer, split into body and citations
    async fn answer(&self, request: &ChatQuestionRequest) -> Result<ParsedAnswer> {
        let stream = self.ask(request).await?;
        AnswerAccumulator::collect(stream).await
    }
}

/// HTTP client for the knowledge service's ask endpoint
pub struct HttpKnowledgeClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpKnowledgeClient {
    /// Create a new client. A `None` base URL is accepted here and
    /// reported on every call instead.
    pub fn new(base_url: Option<String>, connect_timeout: Duration) -> Result<Self> {
        // No total timeout: answers stream for as long as the model writes
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: base_url.map(|url| url.trim().trim_end_matches('/').to_string()),
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(config.knowledge_url().map(str::to_string), config.connect_timeout())
    }

    fn ask_url(&self) -> Result<String> {
        match self.base_url.as_deref() {
            Some(base) if !base.is_empty() => Ok(format!("{}{}", base, KNOWLEDGE_ASK_PATH)),
            _ => Err(AppError::Configuration {
                message: format!("{} is not configured", KNOWLEDGE_SERVICE_URL_ENV),
            }),
        }
    }
}

#[async_trait]
impl KnowledgeService for HttpKnowledgeClient {
    async fn ask(&self, request: &ChatQuestionRequest) -> Result<AnswerStream> {
        let url = self.ask_url()?;
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let err = AppError::from(e);
                metrics::record_upstream_failure(match err {
                    AppError::UpstreamTimeout { .. } => "timeout",
                    _ => "unreachable",
                });
                err
            })?;

        let status = response.status();
        metrics::record_upstream_response(start.elapsed().as_secs_f64(), status.as_u16());

        if !status.is_success() {
            let body = read_error_body(
                response.bytes_stream(),
                MAX_UPSTREAM_ERROR_BODY,
                ERROR_BODY_READ_TIMEOUT,
            )
            .await;

            tracing::warn!(
                url = %url,
                status = status.as_u16(),
                "Knowledge service rejected question"
            );

            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Knowledge service accepted question"
        );

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AppError::from))
            .boxed())
    }

    fn is_configured(&self) -> bool {
        self.base_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Read at most `limit` bytes of an error body, giving up after `timeout`.
/// Whatever arrived before a read error or the deadline is kept.
async fn read_error_body<S, E>(stream: S, limit: usize, timeout: Duration) -> String
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    E: fmt::Display,
{
    let mut buf: Vec<u8> = Vec::new();
    futures::pin_mut!(stream);

    let read = async {
        while buf.len() < limit {
            match stream.next().await {
                Some(Ok(chunk)) => {
                    let take = chunk.len().min(limit - buf.len());
                    buf.extend_from_slice(&chunk[..take]);
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to read knowledge service error body");
                    break;
                }
                None => break,
            }
        }
    };

    if tokio::time::timeout(timeout, read).await.is_err() {
        tracing::warn!(
            timeout_ms = timeout.as_millis() as u64,
            bytes = buf.len(),
            "Timed out reading knowledge service error body"
        );
    }

    // A cut may land inside a multi-byte character
    let end = match std::str::from_utf8(&buf) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => buf.len(),
    };
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Scripted behaviour of [`MockKnowledgeService`]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Stream these chunks, then close
    Chunks(Vec<String>),
    /// Stream these chunks, then fail
    Interrupted(Vec<String>),
    /// Stream these chunks, then never close
    Hang(Vec<String>),
    /// Respond with an error status and body
    Status(u16, String),
    /// Fail as if the service could not be reached
    Unreachable,
}

/// Mock knowledge service for testing
pub struct MockKnowledgeService {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatQuestionRequest>>,
    stream_dropped: Arc<AtomicBool>,
}

impl MockKnowledgeService {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mock streaming the given chunks
    pub fn streaming<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockReply::Chunks(chunks.into_iter().map(Into::into).collect()))
    }

    /// Number of times `ask` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent question received
    pub fn last_request(&self) -> Option<ChatQuestionRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }

    /// Whether the last handed-out stream has been dropped
    pub fn stream_dropped(&self) -> bool {
        self.stream_dropped.load(Ordering::SeqCst)
    }
}

/// Flags the owning stream's drop
struct DropSignal(Arc<AtomicBool>);

impl Drop for DropSignal {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

fn chunk_stream(chunks: Vec<String>) -> BoxStream<'static, Result<Bytes>> {
    futures::stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c)))).boxed()
}

#[async_trait]
impl KnowledgeService for MockKnowledgeService {
    async fn ask(&self, request: &ChatQuestionRequest) -> Result<AnswerStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        self.stream_dropped.store(false, Ordering::SeqCst);
        let signal = DropSignal(self.stream_dropped.clone());

        let stream = match &self.reply {
            MockReply::Chunks(chunks) => chunk_stream(chunks.clone()),
            MockReply::Interrupted(chunks) => chunk_stream(chunks.clone())
                .chain(futures::stream::once(async {
                    Err(AppError::StreamInterrupted {
                        message: "connection reset by peer".to_string(),
                    })
                }))
                .boxed(),
            MockReply::Hang(chunks) => chunk_stream(chunks.clone())
                .chain(futures::stream::pending())
                .boxed(),
            MockReply::Status(status, body) => {
                return Err(AppError::UpstreamStatus {
                    status: *status,
                    body: body.clone(),
                })
            }
            MockReply::Unreachable => {
                return Err(AppError::UpstreamUnreachable {
                    message: "connection refused".to_string(),
                })
            }
        };

        Ok(stream
            .map(move |item| {
                let _held = &signal;
                item
            })
            .boxed())
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ResponseMode;

    fn question() -> ChatQuestionRequest {
        ChatQuestionRequest::new("Who is Krishna?", ResponseMode::Detailed)
    }

    #[tokio::test]
    async fn test_missing_url_fails_before_network() {
        let client = HttpKnowledgeClient::new(None, Duration::from_secs(1)).unwrap();
        assert!(!client.is_configured());

        let err = client.ask(&question()).await.err().unwrap();
        assert!(matches!(err, AppError::Configuration { .. }));
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[test]
    fn test_ask_url_tolerates_trailing_slash() {
        let client = HttpKnowledgeClient::new(
            Some("http://knowledge:8000/".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.ask_url().unwrap(), "http://knowledge:8000/api/ask");
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = HttpKnowledgeClient::new(
            Some("http://127.0.0.1:9".to_string()),
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.ask(&question()).await.err().unwrap();
        assert!(matches!(
            err,
            AppError::UpstreamUnreachable { .. } | AppError::UpstreamTimeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_mock_streams_and_counts() {
        let mock = MockKnowledgeService::streaming(["Hello", " world"]);
        let answer = mock.answer(&question()).await.unwrap();

        assert_eq!(answer.content, "Hello world");
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.last_request(), Some(question()));
        assert!(mock.stream_dropped());
    }

    #[tokio::test]
    async fn test_mock_status_reply() {
        let mock = MockKnowledgeService::new(MockReply::Status(503, "busy".into()));
        let err = mock.ask(&question()).await.err().unwrap();
        assert_eq!(err.status_code().as_u16(), 503);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_interrupted_stream() {
        let mock = MockKnowledgeService::new(MockReply::Interrupted(vec!["partial".into()]));
        let err = mock.answer(&question()).await.unwrap_err();
        assert!(matches!(err, AppError::StreamInterrupted { .. }));
    }

    #[tokio::test]
    async fn test_error_body_is_capped() {
        let endless = futures::stream::repeat_with(|| {
            Ok::<_, std::io::Error>(Bytes::from_static(b"overloaded "))
        });
        let body = read_error_body(endless, 64, Duration::from_secs(5)).await;
        assert_eq!(body.len(), 64);
        assert!(body.starts_with("overloaded overloaded"));
    }

    #[tokio::test]
    async fn test_stalled_error_body_times_out() {
        let stalled = futures::stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from_static(
            b"warming up",
        ))])
        .chain(futures::stream::pending());

        let started = Instant::now();
        let body = read_error_body(stalled, 4096, Duration::from_millis(50)).await;
        assert_eq!(body, "warming up");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_error_body_keeps_text_before_read_failure() {
        let failing = futures::stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let body = read_error_body(failing, 4096, Duration::from_secs(5)).await;
        assert_eq!(body, "partial");
    }

    #[tokio::test]
    async fn test_error_body_cut_inside_character() {
        let chunks = futures::stream::iter(vec![Ok::<_, std::io::Error>(Bytes::from(
            "ab\u{00e9}".as_bytes().to_vec(),
        ))]);
        let body = read_error_body(chunks, 3, Duration::from_secs(5)).await;
        assert_eq!(body, "ab");
    }
}
