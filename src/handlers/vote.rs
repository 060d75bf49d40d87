use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use log::{info, warn};
use serde::Deserialize;

use super::{AppState, VisitorIdentity, VoteResponse};
use crate::error::VoteError;
use crate::models::ItemId;

// Field aliases accept the names the original client script posts. Every
// field is optional so a missing one becomes a rejection reason instead of a
// form parse error.
#[derive(Debug, Deserialize)]
pub struct VoteSubmission {
    #[serde(alias = "post_id")]
    pub item_id: Option<String>,
    pub vote: Option<String>,
    #[serde(alias = "nonce")]
    pub auth_token: Option<String>,
}

impl VoteSubmission {
    fn item_id(&self) -> Result<ItemId, VoteError> {
        let raw = self.item_id.as_deref().unwrap_or_default().trim();
        raw.parse::<ItemId>()
            .map_err(|_| VoteError::InvalidVote(format!("item id {:?}", raw)))
    }
}

pub async fn submit_vote_handler(
    State(state): State<AppState>,
    VisitorIdentity(fingerprint): VisitorIdentity,
    submission: Result<Form<VoteSubmission>, FormRejection>,
) -> Result<Json<VoteResponse>, VoteError> {
    let Form(submission) = submission.map_err(|rejection| {
        warn!("Rejected unreadable vote submission: {}", rejection.body_text());
        VoteError::InvalidVote(rejection.body_text())
    })?;

    let item_id = submission.item_id().map_err(|e| {
        warn!("Rejected vote submission without a usable item id");
        e
    })?;
    info!("Received vote submission for item {}", item_id);

    // No token at all fails the same way a wrong one does
    let Some(auth_token) = submission.auth_token.as_deref() else {
        warn!("Rejected vote on item {} without a token", item_id);
        return Err(VoteError::AuthTokenInvalid);
    };

    let fragment = state
        .widget
        .submit_vote(
            item_id,
            submission.vote.as_deref().unwrap_or_default(),
            auth_token,
            &fingerprint,
        )
        .await?;

    Ok(Json(VoteResponse::accepted(fragment)))
}
