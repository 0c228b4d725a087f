use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::http::{HeaderMap, header};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

use super::protocol::{
    ENDPOINT_LINE, ENDPOINT_RESET, ENDPOINT_STATE, ENDPOINT_UPLOAD, LineRequest, LineResponse,
    ProcessorState,
};
use super::service::ShardProcessor;
use crate::api::{ApiReply, decode, reply_err, reply_ok};
use crate::error::ClusterError;
use crate::membership::protocol::{ENDPOINT_NODES, ENDPOINT_SET_RANGE, SetRangeRequest};
use crate::membership::types::MembershipSnapshot;

pub fn router(processor: Arc<ShardProcessor>) -> Router {
    Router::new()
        .route(ENDPOINT_LINE, post(handle_line))
        .route(ENDPOINT_UPLOAD, post(handle_upload))
        .route(ENDPOINT_SET_RANGE, post(handle_set_range))
        .route(ENDPOINT_NODES, post(handle_nodes))
        .route(ENDPOINT_RESET, post(handle_reset))
        .route(ENDPOINT_STATE, get(handle_state))
        .layer(Extension(processor))
}

pub async fn handle_line(
    Extension(processor): Extension<Arc<ShardProcessor>>,
    payload: Result<Json<LineRequest>, JsonRejection>,
) -> Result<Json<LineResponse>, (StatusCode, Json<ApiReply>)> {
    let req = decode(payload).map_err(|e| reply_err(&e))?;
    tracing::debug!("Received line: {}", req.text);

    let partial = processor
        .process_line(&req.text)
        .await
        .map_err(|e| reply_err(&e))?;

    Ok(Json(LineResponse {
        status: format!("Processed line for range {}", partial.range),
        partial,
    }))
}

/// The file is the raw request body. Multipart forms are refused rather than
/// having their boundaries and part headers counted as words.
pub async fn handle_upload(
    Extension(processor): Extension<Arc<ShardProcessor>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<ApiReply>) {
    if is_multipart(&headers) {
        return reply_err(&ClusterError::MalformedRequest(
            "multipart uploads are not supported, send the file as the raw body".to_string(),
        ));
    }

    if body.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(ApiReply::error("No file provided")));
    }

    match processor.ingest_bytes(&body).await {
        Ok(lines) => {
            let range = processor
                .range()
                .await
                .map(|r| r.to_string())
                .unwrap_or_default();
            reply_ok(format!("File processed for range {} ({} lines)", range, lines))
        }
        Err(e) => reply_err(&e),
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/")
        })
}

pub async fn handle_set_range(
    Extension(processor): Extension<Arc<ShardProcessor>>,
    payload: Result<Json<SetRangeRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    let req = match decode(payload) {
        Ok(req) => req,
        Err(e) => return reply_err(&e),
    };

    match processor.set_range(&req.range, req.version).await {
        Ok(range) => reply_ok(format!("Range set to {}", range)),
        Err(e) => reply_err(&e),
    }
}

pub async fn handle_nodes(
    Extension(processor): Extension<Arc<ShardProcessor>>,
    payload: Result<Json<MembershipSnapshot>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    match decode(payload) {
        Ok(snapshot) => {
            processor.update_membership(snapshot).await;
            reply_ok("Nodes updated")
        }
        Err(e) => reply_err(&e),
    }
}

pub async fn handle_reset(
    Extension(processor): Extension<Arc<ShardProcessor>>,
) -> (StatusCode, Json<ApiReply>) {
    processor.reset();
    reply_ok("Partial results cleared")
}

pub async fn handle_state(
    Extension(processor): Extension<Arc<ShardProcessor>>,
) -> Json<ProcessorState> {
    Json(processor.state().await)
}
