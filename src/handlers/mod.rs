mod content;
mod vote;

use axum::{
    Router,
    extract::{ConnectInfo, FromRequestParts},
    http::{StatusCode, header::USER_AGENT, request::Parts},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::fingerprint::fingerprint;
use crate::models::VisitorFingerprint;
use crate::widget::VotingWidget;

use content::{admin_summary_handler, admin_tally_handler, widget_handler};
use vote::submit_vote_handler;

#[derive(Clone)]
pub struct AppState {
    pub widget: Arc<VotingWidget>,
}

// Envelope the client script expects: data is the fragment or the reason
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteResponse {
    pub success: bool,
    pub data: String,
}

impl VoteResponse {
    pub fn accepted(fragment: String) -> Self {
        Self { success: true, data: fragment }
    }

    pub fn rejected(reason: String) -> Self {
        Self { success: false, data: reason }
    }
}

/// Fingerprint of whoever sent the request, from the peer address and the
/// `User-Agent` header. Never fails: missing pieces give an unknown visitor.
pub struct VisitorIdentity(pub VisitorFingerprint);

impl<S: Send + Sync> FromRequestParts<S> for VisitorIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let address = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        let agent = parts.headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

        Ok(Self(fingerprint(address.as_deref(), agent)))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/votes", post(submit_vote_handler))
        .route("/items/{item_id}/widget", get(widget_handler))
        .route("/admin/items/{item_id}/tally", get(admin_tally_handler))
        .route("/admin/items/{item_id}/summary", get(admin_summary_handler))
        .with_state(state)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}
