use std::collections::HashMap;

use serde::Serialize;

use crate::models::Bet;

/// Gross shot totals between one user and each counterparty.
///
/// Every bet counts, resolved or not: this is the lifetime wager volume
/// between two parties, not the net outstanding view the leaderboard shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShotBalances {
    pub outward: HashMap<i64, i64>,
    pub inward: HashMap<i64, i64>,
    pub total_outward: i64,
    pub total_inward: i64,
}

/// Per-counterparty shot totals from the subject's perspective. Bets not
/// involving the subject are ignored, so callers may pass the full bet set
/// or a pre-filtered one.
pub fn compute_shot_balances(user_id: i64, bets: &[Bet]) -> ShotBalances {
    let mut outward: HashMap<i64, i64> = HashMap::new();
    let mut inward: HashMap<i64, i64> = HashMap::new();

    for bet in bets {
        if bet.bettor_id == user_id {
            *outward.entry(bet.bettee_id).or_insert(0) += i64::from(bet.shots);
        }
        if bet.bettee_id == user_id {
            *inward.entry(bet.bettor_id).or_insert(0) += i64::from(bet.shots);
        }
    }

    let total_outward = outward.values().sum();
    let total_inward = inward.values().sum();

    ShotBalances {
        outward,
        inward,
        total_outward,
        total_inward,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_bet(id: i64, bettor_id: i64, bettee_id: i64, shots: i32, outcome: Option<&str>) -> Bet {
        Bet {
            id,
            date_created: Utc::now(),
            bettor_id,
            bettee_id,
            shots,
            description: format!("bet {id}"),
            outcome: outcome.map(String::from),
        }
    }

    #[test]
    fn test_single_unresolved_bet() {
        let bets = vec![make_bet(1, 1, 2, 3, None)];
        let balances = compute_shot_balances(1, &bets);

        assert_eq!(balances.outward.get(&2), Some(&3));
        assert!(balances.inward.is_empty());
        assert_eq!(balances.total_outward, 3);
        assert_eq!(balances.total_inward, 0);
    }

    #[test]
    fn test_totals_match_map_sums() {
        let bets = vec![
            make_bet(1, 1, 2, 3, None),
            make_bet(2, 1, 3, 5, Some("incomplete")),
            make_bet(3, 2, 1, 2, None),
            make_bet(4, 3, 1, 7, Some("2024-01-01T10:00:00Z")),
        ];
        let balances = compute_shot_balances(1, &bets);

        assert_eq!(balances.total_outward, balances.outward.values().sum::<i64>());
        assert_eq!(balances.total_inward, balances.inward.values().sum::<i64>());
        assert_eq!(balances.total_outward, 8);
        assert_eq!(balances.total_inward, 9);
    }

    #[test]
    fn test_outcome_agnostic() {
        let unresolved = vec![make_bet(1, 1, 2, 3, None)];
        let resolved = vec![make_bet(1, 1, 2, 3, Some("2024-01-01T10:00:00Z"))];
        let voided = vec![make_bet(1, 1, 2, 3, Some("expired"))];

        let a = compute_shot_balances(1, &unresolved);
        let b = compute_shot_balances(1, &resolved);
        let c = compute_shot_balances(1, &voided);

        assert_eq!(a.total_outward, 3);
        assert_eq!(b.total_outward, 3);
        assert_eq!(c.total_outward, 3);
        assert_eq!(a.outward, b.outward);
        assert_eq!(a.outward, c.outward);
    }

    #[test]
    fn test_multiple_bets_accumulate_per_counterparty() {
        let bets = vec![
            make_bet(1, 1, 2, 3, None),
            make_bet(2, 1, 2, 4, None),
            make_bet(3, 2, 1, 1, None),
        ];
        let balances = compute_shot_balances(1, &bets);

        assert_eq!(balances.outward.get(&2), Some(&7));
        assert_eq!(balances.inward.get(&2), Some(&1));
    }

    #[test]
    fn test_uninvolved_user_gets_empty_shape() {
        let bets = vec![make_bet(1, 1, 2, 3, None)];
        let balances = compute_shot_balances(42, &bets);

        assert!(balances.outward.is_empty());
        assert!(balances.inward.is_empty());
        assert_eq!(balances.total_outward, 0);
        assert_eq!(balances.total_inward, 0);
    }

    #[test]
    fn test_empty_input() {
        let balances = compute_shot_balances(1, &[]);
        assert!(balances.outward.is_empty());
        assert_eq!(balances.total_inward, 0);
    }

    #[test]
    fn test_self_bet_counts_both_sides() {
        let bets = vec![make_bet(1, 5, 5, 2, None)];
        let balances = compute_shot_balances(5, &bets);

        assert_eq!(balances.outward.get(&5), Some(&2));
        assert_eq!(balances.inward.get(&5), Some(&2));
        assert_eq!(balances.total_outward, 2);
        assert_eq!(balances.total_inward, 2);
    }
}
