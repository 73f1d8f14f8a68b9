//! Proportional reward distribution and pull-based claims.
//!
//! A distribution ranks the scope's contributors by cumulative write count,
//! keeps the top `paid`, and splits the amount pro rata over exactly that
//! set. Quotas are floored; the single highest-ranked contributor receives
//! the remainder instead of its own floor quota, so the payouts always sum
//! to the full amount. Counts are never reset, so reporters below the
//! cutoff stay eligible for future rounds.

use auspex_types::{AccountId, Amount, Timestamp, TransferRequest};

use crate::stats::StatsTable;
use crate::{EngineError, Result};

/// Compute per-reporter payouts for `amount` over a ranked contributor
/// snapshot (count descending, as produced by
/// [`StatsTable::ranked_by_count`]). At most `paid` reporters are paid.
///
/// Returned in credit order, lowest rank first; the last element is the top
/// contributor carrying the remainder.
///
/// # Errors
///
/// - [`EngineError::DivisionByZero`] if the eligible set is empty or its
///   total count is zero
pub fn compute_payouts(
    ranked: &[(AccountId, u64)],
    paid: u64,
    amount: Amount,
) -> Result<Vec<(AccountId, Amount)>> {
    let upperbound = ranked.len().min(paid as usize);
    let eligible = &ranked[..upperbound];

    let total: u128 = eligible.iter().map(|(_, count)| u128::from(*count)).sum();
    if total == 0 {
        return Err(EngineError::DivisionByZero);
    }

    let mut payouts = Vec::with_capacity(upperbound);
    let mut allocated: Amount = 0;

    for (account, count) in eligible.iter().skip(1).rev() {
        let quota = (u128::from(*count) * u128::from(amount) / total) as Amount;
        payouts.push((account.clone(), quota));
        allocated += quota;
    }

    // Leftovers go to the top contributor, eliminating rounding leakage.
    let (top, _) = &eligible[0];
    payouts.push((top.clone(), amount - allocated));

    Ok(payouts)
}

/// Claim a reporter's full claimable balance from the global table.
///
/// Zeroes the balance, stamps the claim time, and returns the transfer
/// request for the host ledger to execute.
///
/// # Errors
///
/// - [`EngineError::NothingToClaim`] if the reporter is unknown or its
///   balance is zero
pub fn claim(global: &mut StatsTable, reporter: &str, now: Timestamp) -> Result<TransferRequest> {
    let stat = global.get_mut(reporter).ok_or(EngineError::NothingToClaim)?;
    if stat.balance == 0 {
        return Err(EngineError::NothingToClaim);
    }

    let amount = stat.balance;
    stat.balance = 0;
    stat.last_claim = now;

    tracing::info!(reporter, amount, "claim paid out");
    Ok(TransferRequest {
        to: reporter.to_string(),
        amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(entries: &[(&str, u64)]) -> Vec<(AccountId, u64)> {
        entries.iter().map(|(n, c)| (n.to_string(), *c)).collect()
    }

    #[test]
    fn test_proportional_split_with_remainder_to_top() {
        let payouts = compute_payouts(&ranked(&[("a", 50), ("b", 30), ("c", 20)]), 21, 1000)
            .expect("distribute");
        assert_eq!(
            payouts,
            vec![
                ("c".to_string(), 200),
                ("b".to_string(), 300),
                ("a".to_string(), 500),
            ]
        );
    }

    #[test]
    fn test_remainder_effect() {
        // Floors are 33 + 33; the top contributor gets 100 - 66 = 34.
        let payouts = compute_payouts(&ranked(&[("a", 34), ("b", 33), ("c", 33)]), 21, 100)
            .expect("distribute");
        assert_eq!(
            payouts,
            vec![
                ("c".to_string(), 33),
                ("b".to_string(), 33),
                ("a".to_string(), 34),
            ]
        );
        let total: Amount = payouts.iter().map(|(_, a)| a).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_paid_cutoff_limits_eligible_set() {
        // Only the top two are paid; the third's count is excluded from the
        // total as well as from the payouts.
        let payouts = compute_payouts(&ranked(&[("a", 100), ("b", 60), ("c", 40)]), 2, 100)
            .expect("distribute");
        // total = 160: b gets floor(60*100/160) = 37, a the remainder.
        assert_eq!(
            payouts,
            vec![("b".to_string(), 37), ("a".to_string(), 63)]
        );
    }

    #[test]
    fn test_zero_contribution_fails() {
        assert!(matches!(
            compute_payouts(&[], 21, 1000),
            Err(EngineError::DivisionByZero)
        ));
        assert!(matches!(
            compute_payouts(&ranked(&[("a", 0)]), 21, 1000),
            Err(EngineError::DivisionByZero)
        ));
    }

    #[test]
    fn test_single_contributor_takes_all() {
        let payouts =
            compute_payouts(&ranked(&[("a", 7)]), 21, 999).expect("distribute");
        assert_eq!(payouts, vec![("a".to_string(), 999)]);
    }

    #[test]
    fn test_claim_zeroes_balance() {
        let mut global = StatsTable::new();
        global.credit("alice", 750);

        let request = claim(&mut global, "alice", 1_234).expect("claim");
        assert_eq!(request.to, "alice");
        assert_eq!(request.amount, 750);

        let stat = global.get("alice").expect("record");
        assert_eq!(stat.balance, 0);
        assert_eq!(stat.last_claim, 1_234);

        assert!(matches!(
            claim(&mut global, "alice", 1_235),
            Err(EngineError::NothingToClaim)
        ));
    }

    #[test]
    fn test_claim_unknown_reporter() {
        let mut global = StatsTable::new();
        assert!(matches!(
            claim(&mut global, "nobody", 1),
            Err(EngineError::NothingToClaim)
        ));
    }
}
