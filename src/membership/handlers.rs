use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

use super::protocol::{
    ENDPOINT_MEMBERSHIP, ENDPOINT_REGISTER, ENDPOINT_START, MembershipResponse, RegisterRequest,
    StartRequest,
};
use super::registry::RegistrationOutcome;
use super::service::Coordinator;
use crate::api::{ApiReply, decode, reply_err, reply_ok};

pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route("/", get(handle_home))
        .route(ENDPOINT_REGISTER, post(handle_register))
        .route(ENDPOINT_MEMBERSHIP, get(handle_membership))
        .route(ENDPOINT_START, post(handle_start))
        .layer(Extension(coordinator))
}

async fn handle_home() -> Json<ApiReply> {
    Json(ApiReply::status("coordinator"))
}

pub async fn handle_register(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    let req = match decode(payload) {
        Ok(req) => req,
        Err(e) => return reply_err(&e),
    };

    match coordinator.register_request(req).await {
        Ok(RegistrationOutcome::AlreadyRegistered) => reply_ok("Already registered"),
        Ok(_) => reply_ok("Registered"),
        Err(e) => reply_err(&e),
    }
}

pub async fn handle_membership(
    Extension(coordinator): Extension<Arc<Coordinator>>,
) -> Json<MembershipResponse> {
    Json(MembershipResponse {
        membership: coordinator.snapshot().await,
        assignments: coordinator.assignments().await,
    })
}

pub async fn handle_start(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    payload: Result<Json<StartRequest>, JsonRejection>,
) -> (StatusCode, Json<ApiReply>) {
    let req = match decode(payload) {
        Ok(req) => req,
        Err(e) => return reply_err(&e),
    };

    match coordinator.dispatch_file(&req.filename).await {
        Ok(lines) => reply_ok(format!("Document processed ({} lines)", lines)),
        Err(e) => reply_err(&e),
    }
}
