use log::warn;
use std::sync::Arc;

use crate::auth::{AuthToken, TokenIssuer};
use crate::error::VoteError;
use crate::models::{ItemId, VisitorFingerprint};
use crate::render::{VotingView, render_view, render_widget, select_view};
use crate::voting::{AggregateTally, VotingEngine};

/// Glue between the engine, the token issuer and the renderer.
///
/// The content pipeline calls `render_for_visitor` and splices the result
/// into the page. The vote endpoint calls `submit_vote`. Both end in
/// `render_view`.
pub struct VotingWidget {
    engine: Arc<VotingEngine>,
    tokens: Arc<TokenIssuer>,
}

impl VotingWidget {
    pub fn new(engine: Arc<VotingEngine>, tokens: Arc<TokenIssuer>) -> Self {
        Self { engine, tokens }
    }

    pub async fn render_for_visitor(
        &self,
        item_id: ItemId,
        fingerprint: &VisitorFingerprint,
    ) -> Result<String, VoteError> {
        let auth_token = self.tokens.issue(item_id);
        let view = self.view_for_visitor(item_id, fingerprint, auth_token.clone()).await?;
        Ok(render_widget(item_id, &auth_token, &view))
    }

    /// Verify the token, cast the vote and render the results fragment.
    ///
    /// A bad token is rejected before the engine sees the request.
    pub async fn submit_vote(
        &self,
        item_id: ItemId,
        vote: &str,
        auth_token: &str,
        fingerprint: &VisitorFingerprint,
    ) -> Result<String, VoteError> {
        if let Err(e) = self.tokens.verify(item_id, auth_token) {
            warn!("Rejected vote on item {} with invalid token", item_id);
            return Err(e);
        }

        let outcome = self.engine.cast_vote(item_id, fingerprint, vote).await?;
        Ok(render_view(&VotingView::voted(outcome.vote, outcome.tally)))
    }

    pub async fn tally(&self, item_id: ItemId) -> Result<AggregateTally, VoteError> {
        self.engine.get_tally(item_id).await
    }

    pub async fn view_for_visitor(
        &self,
        item_id: ItemId,
        fingerprint: &VisitorFingerprint,
        auth_token: AuthToken,
    ) -> Result<VotingView, VoteError> {
        let (prior_vote, tally) = self.engine.visitor_state(item_id, fingerprint).await?;
        Ok(select_view(prior_vote.is_some(), prior_vote, tally, auth_token))
    }
}
