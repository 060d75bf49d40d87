use crate::auth::AuthToken;
use crate::models::{ItemId, VoteValue};
use crate::voting::AggregateTally;

const PROMPT: &str = "WAS THIS ARTICLE HELPFUL?";
const THANKS: &str = "THANK YOU FOR YOUR FEEDBACK!";

const HAPPY_ICON: &str = r#"<svg class="vote-icon" viewBox="0 0 24 24" aria-hidden="true"><circle cx="12" cy="12" r="10" fill="none" stroke="currentColor"/><path d="M8 14s1.5 2 4 2 4-2 4-2" fill="none" stroke="currentColor"/></svg>"#;
const SAD_ICON: &str = r#"<svg class="vote-icon" viewBox="0 0 24 24" aria-hidden="true"><circle cx="12" cy="12" r="10" fill="none" stroke="currentColor"/><path d="M16 16s-1.5-2-4-2-4 2-4 2" fill="none" stroke="currentColor"/></svg>"#;

/// The two states the voting widget can be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VotingView {
    Unvoted { auth_token: AuthToken },
    Voted { prior_vote: VoteValue, tally: AggregateTally },
}

impl VotingView {
    // A visitor who has voted needs no token
    pub fn voted(prior_vote: VoteValue, tally: AggregateTally) -> Self {
        VotingView::Voted { prior_vote, tally }
    }
}

/// Pick the view for a visitor. Both the page render and the vote response
/// go through here, so they can't disagree.
pub fn select_view(
    has_voted: bool,
    prior_vote: Option<VoteValue>,
    tally: AggregateTally,
    auth_token: AuthToken,
) -> VotingView {
    match (has_voted, prior_vote) {
        (true, Some(prior_vote)) => VotingView::voted(prior_vote, tally),
        _ => VotingView::Unvoted { auth_token },
    }
}

// Inner markup of the widget, the part a vote response swaps in
pub fn render_view(view: &VotingView) -> String {
    match view {
        VotingView::Unvoted { auth_token } => {
            let mut html = format!("<p>{}</p>", PROMPT);
            html.push_str(&vote_button(VoteValue::Positive, auth_token));
            html.push_str(&vote_button(VoteValue::Negative, auth_token));
            html
        }
        VotingView::Voted { prior_vote, tally } => {
            let mut html = format!("<p>{}</p>", THANKS);
            for side in [VoteValue::Positive, VoteValue::Negative] {
                html.push_str(&vote_result(side, *prior_vote == side, tally.percentage(side)));
            }
            html
        }
    }
}

pub fn render_widget(item_id: ItemId, auth_token: &AuthToken, view: &VotingView) -> String {
    format!(
        r#"<div class="article-voting" data-post-id="{}" data-nonce="{}">{}</div>"#,
        item_id,
        auth_token,
        render_view(view)
    )
}

pub fn render_admin_summary(tally: &AggregateTally) -> String {
    format!(
        "<p><strong>Positive Votes:</strong> {}</p><p><strong>Negative Votes:</strong> {}</p>",
        tally.positive_count, tally.negative_count
    )
}

fn icon(vote: VoteValue) -> &'static str {
    match vote {
        VoteValue::Positive => HAPPY_ICON,
        VoteValue::Negative => SAD_ICON,
    }
}

fn vote_button(vote: VoteValue, auth_token: &AuthToken) -> String {
    let label = match vote {
        VoteValue::Positive => "YES",
        VoteValue::Negative => "NO",
    };
    format!(
        r#"<button class="vote-button" data-vote="{}" data-nonce="{}">{}<span>{}</span></button>"#,
        vote,
        auth_token,
        icon(vote),
        label
    )
}

fn vote_result(vote: VoteValue, active: bool, percentage: u32) -> String {
    let class = if active { "vote-result active" } else { "vote-result" };
    format!(
        r#"<div class="{}" data-vote="{}">{}<span>{}%</span></div>"#,
        class,
        vote,
        icon(vote),
        percentage
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use chrono::Duration;

    fn token() -> AuthToken {
        TokenIssuer::new("render-test", Duration::hours(1)).unwrap().issue(1)
    }

    fn voted(prior_vote: VoteValue) -> String {
        let tally = AggregateTally { positive_count: 3, negative_count: 1 };
        render_view(&select_view(true, Some(prior_vote), tally, token()))
    }

    #[test]
    fn unvoted_view_offers_both_choices_with_token() {
        let token = token();
        let html = render_view(&select_view(false, None, AggregateTally::default(), token.clone()));
        assert!(html.contains(PROMPT));
        assert!(html.contains(r#"data-vote="positive""#));
        assert!(html.contains(r#"data-vote="negative""#));
        assert_eq!(html.matches(&format!(r#"data-nonce="{}""#, token)).count(), 2);
        assert!(!html.contains("vote-result"));
    }

    #[test]
    fn voted_view_marks_only_the_visitors_choice() {
        let html = voted(VoteValue::Positive);
        assert!(html.contains(THANKS));
        assert!(html.contains(r#"<div class="vote-result active" data-vote="positive">"#));
        assert!(html.contains(r#"<div class="vote-result" data-vote="negative">"#));
        assert!(html.contains("<span>75%</span>"));
        assert!(html.contains("<span>25%</span>"));
        assert!(!html.contains("vote-button"));

        let html = voted(VoteValue::Negative);
        assert!(html.contains(r#"<div class="vote-result" data-vote="positive">"#));
        assert!(html.contains(r#"<div class="vote-result active" data-vote="negative">"#));
        assert_eq!(html.matches("active").count(), 1);
    }

    #[test]
    fn voted_constructor_matches_the_selected_view() {
        let tally = AggregateTally { positive_count: 2, negative_count: 5 };
        let selected = select_view(true, Some(VoteValue::Negative), tally, token());
        assert_eq!(VotingView::voted(VoteValue::Negative, tally), selected);
        assert!(!render_view(&selected).contains("data-nonce"));
    }

    #[test]
    fn has_voted_without_a_prior_vote_falls_back_to_prompt() {
        let view = select_view(true, None, AggregateTally::default(), token());
        assert!(matches!(view, VotingView::Unvoted { .. }));
    }

    #[test]
    fn widget_wraps_the_view_with_item_and_token() {
        let token = token();
        let view = select_view(false, None, AggregateTally::default(), token.clone());
        let html = render_widget(77, &token, &view);
        assert!(html.starts_with(&format!(
            r#"<div class="article-voting" data-post-id="77" data-nonce="{}">"#,
            token
        )));
        assert!(html.contains(&render_view(&view)));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn admin_summary_lists_counts() {
        let html = render_admin_summary(&AggregateTally { positive_count: 4, negative_count: 2 });
        assert_eq!(
            html,
            "<p><strong>Positive Votes:</strong> 4</p><p><strong>Negative Votes:</strong> 2</p>"
        );
    }
}
