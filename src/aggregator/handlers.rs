use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

use super::protocol::{ENDPOINT_LEARN, ENDPOINT_RESET, ENDPOINT_RESULTS, ReportResponse};
use super::service::Aggregator;
use crate::api::{ApiReply, decode, reply_err, reply_ok};
use crate::membership::protocol::ENDPOINT_NODES;
use crate::membership::types::MembershipSnapshot;
use crate::shard::PartialResult;

pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route(ENDPOINT_LEARN, post(handle_learn))
        .route(ENDPOINT_RESULTS, get(handle_results))
        .route(ENDPOINT_RESET, post(handle_reset))
        .route(ENDPOINT_NODES, post(handle_nodes))
        .layer(Extension(aggregator))
}

pub async fn handle_learn(
    Extension(aggregator): Extension<Arc<Aggregator>>,
    payload: Result<Json<PartialResult>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    match decode(payload) {
        Ok(partial) => {
            aggregator.merge(&partial).await;
            reply_ok("Learned")
        }
        Err(e) => reply_err(&e),
    }
}

pub async fn handle_results(
    Extension(aggregator): Extension<Arc<Aggregator>>,
) -> Json<ReportResponse> {
    Json(aggregator.report().await)
}

pub async fn handle_reset(
    Extension(aggregator): Extension<Arc<Aggregator>>,
) -> (StatusCode, Json<ApiReply>) {
    aggregator.reset().await;
    reply_ok("Results cleared")
}

/// The learner has no downstream peers; the snapshot is only logged.
pub async fn handle_nodes(
    payload: Result<Json<MembershipSnapshot>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    match decode(payload) {
        Ok(snapshot) => {
            tracing::info!(
                "Membership v{}: {} processor(s), {} validator(s)",
                snapshot.version,
                snapshot.shard_processors.len(),
                snapshot.validators.len()
            );
            reply_ok("Nodes updated")
        }
        Err(e) => reply_err(&e),
    }
}
