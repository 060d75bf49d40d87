use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};

use super::{AppState, VisitorIdentity};
use crate::error::VoteError;
use crate::models::ItemId;
use crate::render::render_admin_summary;
use crate::voting::TallySummary;

// Content render hook: the widget as the requesting visitor should see it
pub async fn widget_handler(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
    VisitorIdentity(fingerprint): VisitorIdentity,
) -> Result<Html<String>, VoteError> {
    let html = state.widget.render_for_visitor(item_id, &fingerprint).await?;
    Ok(Html(html))
}

pub async fn admin_tally_handler(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<TallySummary>, VoteError> {
    let tally = state.widget.tally(item_id).await?;
    Ok(Json(tally.summary()))
}

pub async fn admin_summary_handler(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Html<String>, VoteError> {
    let tally = state.widget.tally(item_id).await?;
    Ok(Html(render_admin_summary(&tally)))
}
