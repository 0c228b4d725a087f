use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

use super::protocol::ENDPOINT_ACCEPT;
use super::service::Validator;
use crate::api::{ApiReply, decode, reply_err, reply_ok};
use crate::membership::protocol::ENDPOINT_NODES;
use crate::membership::types::MembershipSnapshot;
use crate::shard::PartialResult;

pub fn router(validator: Arc<Validator>) -> Router {
    Router::new()
        .route(ENDPOINT_ACCEPT, post(handle_accept))
        .route(ENDPOINT_NODES, post(handle_nodes))
        .layer(Extension(validator))
}

pub async fn handle_accept(
    Extension(validator): Extension<Arc<Validator>>,
    payload: Result<Json<PartialResult>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    let partial = match decode(payload) {
        Ok(partial) => partial,
        Err(e) => return reply_err(&e),
    };

    match validator.accept(partial).await {
        Ok(verdict) => reply_ok(verdict.describe()),
        Err(e) => reply_err(&e),
    }
}

pub async fn handle_nodes(
    Extension(validator): Extension<Arc<Validator>>,
    payload: Result<Json<MembershipSnapshot>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    match decode(payload) {
        Ok(snapshot) => {
            validator.update_membership(snapshot).await;
            reply_ok("Nodes updated")
        }
        Err(e) => reply_err(&e),
    }
}
