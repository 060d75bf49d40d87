use crate::models::{VoteRecord, VoteValue};
use crate::voting::AggregateTally;

pub fn calculate_tally(record: &VoteRecord) -> AggregateTally {
    // A side nobody voted for simply stays at zero
    let mut tally = AggregateTally::default();

    for vote in record.votes().values() {
        match vote {
            VoteValue::Positive => tally.positive_count += 1,
            VoteValue::Negative => tally.negative_count += 1,
        }
    }

    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_of(votes: &[(&str, VoteValue)]) -> VoteRecord {
        let mut record = VoteRecord::new();
        for (key, vote) in votes {
            record.insert(key.to_string(), *vote);
        }
        record
    }

    #[test]
    fn empty_record_is_zero() {
        assert_eq!(calculate_tally(&VoteRecord::new()), AggregateTally::default());
    }

    #[test]
    fn counts_each_side() {
        let record = record_of(&[
            ("a", VoteValue::Positive),
            ("b", VoteValue::Positive),
            ("c", VoteValue::Negative),
            ("d", VoteValue::Positive),
        ]);
        let tally = calculate_tally(&record);
        assert_eq!(tally.positive_count, 3);
        assert_eq!(tally.negative_count, 1);
        assert_eq!(tally.total_votes() as usize, record.len());
    }

    #[test]
    fn only_negative_votes() {
        let tally = calculate_tally(&record_of(&[("a", VoteValue::Negative)]));
        assert_eq!(tally.positive_count, 0);
        assert_eq!(tally.negative_count, 1);
        assert_eq!(tally.negative_percentage(), 100);
    }
}
