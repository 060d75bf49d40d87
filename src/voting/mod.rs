pub mod engine;
pub mod tally;

use serde::Serialize;

use crate::models::VoteValue;

pub use engine::VotingEngine;

// Positive/negative counts for one item, derived from its vote record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateTally {
    pub positive_count: u64,
    pub negative_count: u64,
}

impl AggregateTally {
    pub fn total_votes(&self) -> u64 {
        self.positive_count + self.negative_count
    }

    pub fn count(&self, vote: VoteValue) -> u64 {
        match vote {
            VoteValue::Positive => self.positive_count,
            VoteValue::Negative => self.negative_count,
        }
    }

    /// Share of `vote` in whole percent, rounded half away from zero.
    ///
    /// The two percentages can add up to 99 or 101; that is left as is.
    pub fn percentage(&self, vote: VoteValue) -> u32 {
        let total = self.total_votes();
        if total == 0 {
            return 0;
        }
        (self.count(vote) as f64 * 100.0 / total as f64).round() as u32
    }

    pub fn positive_percentage(&self) -> u32 {
        self.percentage(VoteValue::Positive)
    }

    pub fn negative_percentage(&self) -> u32 {
        self.percentage(VoteValue::Negative)
    }

    pub fn summary(&self) -> TallySummary {
        TallySummary {
            positive_count: self.positive_count,
            negative_count: self.negative_count,
            total_votes: self.total_votes(),
            positive_percentage: self.positive_percentage(),
            negative_percentage: self.negative_percentage(),
        }
    }
}

// Admin-facing shape of a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallySummary {
    pub positive_count: u64,
    pub negative_count: u64,
    pub total_votes: u64,
    pub positive_percentage: u32,
    pub negative_percentage: u32,
}

// What an accepted vote hands back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastOutcome {
    pub vote: VoteValue,
    pub tally: AggregateTally,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_to_one_is_seventy_five_twenty_five() {
        let tally = AggregateTally { positive_count: 3, negative_count: 1 };
        assert_eq!(tally.positive_percentage(), 75);
        assert_eq!(tally.negative_percentage(), 25);
    }

    #[test]
    fn zero_votes_is_zero_percent() {
        let tally = AggregateTally::default();
        assert_eq!(tally.total_votes(), 0);
        assert_eq!(tally.positive_percentage(), 0);
        assert_eq!(tally.negative_percentage(), 0);
    }

    #[test]
    fn rounding_drift_is_not_corrected() {
        // 12.5 and 87.5 both round up
        let tally = AggregateTally { positive_count: 1, negative_count: 7 };
        assert_eq!(tally.positive_percentage(), 13);
        assert_eq!(tally.negative_percentage(), 88);
        assert_eq!(tally.positive_percentage() + tally.negative_percentage(), 101);
    }

    #[test]
    fn one_sided_tally_has_zero_for_the_other_side() {
        let tally = AggregateTally { positive_count: 4, negative_count: 0 };
        assert_eq!(tally.positive_percentage(), 100);
        assert_eq!(tally.negative_percentage(), 0);
    }

    #[test]
    fn summary_carries_counts_and_percentages() {
        let summary = AggregateTally { positive_count: 1, negative_count: 1 }.summary();
        assert_eq!(summary.total_votes, 2);
        assert_eq!(summary.positive_percentage, 50);
        assert_eq!(summary.negative_percentage, 50);
    }
}
