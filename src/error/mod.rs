use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use thiserror::Error;

use crate::handlers::VoteResponse;

// Failures coming out of a VoteStore backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported vote record version {0}")]
    UnsupportedVersion(u32),
}

/// Everything a vote submission can be rejected with.
///
/// The `Display` strings double as the rejection reasons sent back to the
/// client script, so keep them stable.
#[derive(Error, Debug)]
pub enum VoteError {
    #[error("invalid vote")]
    InvalidVote(String),

    #[error("already voted")]
    AlreadyVoted,

    #[error("invalid token")]
    AuthTokenInvalid,

    #[error("storage unavailable")]
    StorageUnavailable(#[from] StoreError),
}

impl VoteError {
    pub fn status(&self) -> StatusCode {
        match self {
            VoteError::InvalidVote(_) => StatusCode::BAD_REQUEST,
            VoteError::AlreadyVoted => StatusCode::CONFLICT,
            VoteError::AuthTokenInvalid => StatusCode::FORBIDDEN,
            VoteError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        if let VoteError::StorageUnavailable(ref source) = self {
            error!("Vote storage failure: {}", source);
        }

        (self.status(), Json(VoteResponse::rejected(self.to_string()))).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reasons_match_the_wire_strings() {
        assert_eq!(VoteError::AlreadyVoted.to_string(), "already voted");
        assert_eq!(VoteError::AuthTokenInvalid.to_string(), "invalid token");
        assert_eq!(VoteError::InvalidVote("maybe".into()).to_string(), "invalid vote");
        assert_eq!(
            VoteError::from(StoreError::UnsupportedVersion(9)).to_string(),
            "storage unavailable"
        );
    }

    #[test]
    fn already_voted_is_distinguishable_by_status() {
        assert_eq!(VoteError::AlreadyVoted.status(), StatusCode::CONFLICT);
        assert_eq!(VoteError::AuthTokenInvalid.status(), StatusCode::FORBIDDEN);
        assert_ne!(VoteError::AlreadyVoted.status(), VoteError::InvalidVote(String::new()).status());
    }
}
