//! Chat relay handler

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use scripture_chat_common::{
    chat::ChatQuestionRequest,
    errors::{AppError, Result},
    metrics,
};

use crate::relay::RelayStream;
use crate::AppState;

static X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Forward a question to the knowledge service and stream its answer back.
///
/// The body is parsed as JSON whatever its content type. Invalid input is
/// rejected before the knowledge service is contacted. Upstream failures
/// keep the upstream status code.
pub async fn chat(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let body = body.map_err(|rejection| body_error(rejection, state.config.server.max_body_bytes))?;
    let request = ChatQuestionRequest::from_json_slice(&body)?;
    request.validate_question(state.config.knowledge.max_question_chars)?;

    metrics::record_question(request.mode.as_str());
    tracing::info!(
        mode = %request.mode,
        question_chars = request.question.chars().count(),
        upstream = state.knowledge.name(),
        "Relaying question"
    );

    let upstream = state.knowledge.ask(&request).await?;
    let relay = RelayStream::new(upstream, request.mode);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
            (X_ACCEL_BUFFERING.clone(), "no"),
        ],
        Body::from_stream(relay),
    )
        .into_response())
}

fn body_error(rejection: BytesRejection, limit: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::InvalidFormat {
            message: rejection.body_text(),
        }
    }
}
