//! Answer stream relay
//!
//! Wraps the upstream byte stream handed to the response body. Chunks pass
//! through untouched and in order; the wrapper only counts them and reports
//! how the stream ended. When the caller disconnects, hyper drops the body,
//! which drops this wrapper and with it the upstream connection.

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use scripture_chat_common::{
    chat::ResponseMode,
    errors::Result,
    knowledge::AnswerStream,
    metrics::{self, StreamOutcome},
};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

pub struct RelayStream {
    inner: AnswerStream,
    mode: ResponseMode,
    started: Instant,
    bytes: u64,
    chunks: u64,
    outcome: Option<StreamOutcome>,
}

impl RelayStream {
    pub fn new(inner: AnswerStream, mode: ResponseMode) -> Self {
        metrics::record_stream_started();
        Self {
            inner,
            mode,
            started: Instant::now(),
            bytes: 0,
            chunks: 0,
            outcome: None,
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.outcome.is_some() {
            return Poll::Ready(None);
        }

        match self.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.bytes += chunk.len() as u64;
                self.chunks += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                // Headers are already out; failing the body aborts the connection
                tracing::error!(
                    error = %e,
                    bytes = self.bytes,
                    chunks = self.chunks,
                    "Answer stream failed mid-relay"
                );
                self.outcome = Some(StreamOutcome::Failed);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.outcome = Some(StreamOutcome::Completed);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        let outcome = self.outcome.unwrap_or(StreamOutcome::Abandoned);
        let elapsed = self.started.elapsed();

        if outcome == StreamOutcome::Abandoned {
            tracing::info!(
                mode = %self.mode,
                bytes = self.bytes,
                chunks = self.chunks,
                "Caller disconnected, releasing upstream stream"
            );
        } else {
            tracing::info!(
                mode = %self.mode,
                outcome = outcome.as_str(),
                bytes = self.bytes,
                chunks = self.chunks,
                duration_ms = elapsed.as_millis() as u64,
                "Answer stream finished"
            );
        }

        metrics::record_stream_finished(outcome, elapsed.as_secs_f64(), self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scripture_chat_common::errors::AppError;

    fn stream_of(items: Vec<Result<Bytes>>) -> AnswerStream {
        futures::stream::iter(items).boxed()
    }

    #[tokio::test]
    async fn test_passes_chunks_in_order() {
        let relay = RelayStream::new(
            stream_of(vec![
                Ok(Bytes::from_static(b"one ")),
                Ok(Bytes::from_static(b"two ")),
                Ok(Bytes::from_static(b"three")),
            ]),
            ResponseMode::Quick,
        );

        let chunks: Vec<Bytes> = relay.map(|c| c.unwrap()).collect().await;
        assert_eq!(
            chunks,
            vec![
                Bytes::from_static(b"one "),
                Bytes::from_static(b"two "),
                Bytes::from_static(b"three"),
            ]
        );
    }

    #[tokio::test]
    async fn test_records_completion() {
        let mut relay = RelayStream::new(
            stream_of(vec![Ok(Bytes::from_static(b"abc"))]),
            ResponseMode::Detailed,
        );

        while relay.next().await.is_some() {}
        assert_eq!(relay.outcome, Some(StreamOutcome::Completed));
        assert_eq!(relay.bytes, 3);
        assert_eq!(relay.chunks, 1);
    }

    #[tokio::test]
    async fn test_stops_after_error() {
        let mut relay = RelayStream::new(
            stream_of(vec![
                Ok(Bytes::from_static(b"partial")),
                Err(AppError::StreamInterrupted {
                    message: "reset".into(),
                }),
                Ok(Bytes::from_static(b"never sent")),
            ]),
            ResponseMode::Detailed,
        );

        assert!(relay.next().await.unwrap().is_ok());
        assert!(relay.next().await.unwrap().is_err());
        assert!(relay.next().await.is_none());
        assert_eq!(relay.outcome, Some(StreamOutcome::Failed));
    }

    #[tokio::test]
    async fn test_unfinished_stream_is_abandoned() {
        let mut relay = RelayStream::new(
            futures::stream::iter(vec![Ok(Bytes::from_static(b"first"))])
                .chain(futures::stream::pending())
                .boxed(),
            ResponseMode::Quick,
        );

        assert!(relay.next().await.is_some());
        assert!(relay.outcome.is_none());
        drop(relay);
    }
}
