//! Per-reporter statistics: last-write timestamps for cooldown enforcement,
//! cumulative write counts for ranking and reward shares, and claimable
//! balances.
//!
//! Two parallel scopes exist: one global [`StatsTable`] for the whole engine
//! and one table per pair. Cooldowns for datapoint writes are enforced
//! against the per-pair table; claimable funds live only in the global one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use auspex_types::{AccountId, Amount, Timestamp};

use crate::{EngineError, Result};

/// Statistics for one reporter within one scope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterStat {
    /// Timestamp of the most recent accepted write in this scope.
    pub last_write: Timestamp,
    /// Cumulative accepted writes in this scope. Never resets.
    pub count: u64,
    /// Timestamp of the most recent claim (global scope only).
    pub last_claim: Timestamp,
    /// Claimable balance in base units (global scope only).
    pub balance: Amount,
}

/// An ordered table of reporter statistics for one scope.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsTable {
    records: BTreeMap<AccountId, ReporterStat>,
}

impl StatsTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a reporter's record.
    pub fn get(&self, account: &str) -> Option<&ReporterStat> {
        self.records.get(account)
    }

    pub(crate) fn get_mut(&mut self, account: &str) -> Option<&mut ReporterStat> {
        self.records.get_mut(account)
    }

    /// Number of reporters tracked in this scope.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the scope has no reporters.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check the cooldown gate for a reporter without recording anything.
    /// A reporter with no record in this scope passes unconditionally.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Cooldown`] if `now` is earlier than the reporter's
    ///   last write plus `cooldown`
    pub fn check_cooldown(&self, account: &str, now: Timestamp, cooldown: Timestamp) -> Result<()> {
        if let Some(stat) = self.records.get(account) {
            if now < stat.last_write.saturating_add(cooldown) {
                return Err(EngineError::Cooldown);
            }
        }
        Ok(())
    }

    /// Record an accepted write: create the record with count 1 on first
    /// sight, otherwise bump the count and timestamp. The caller is expected
    /// to have run [`Self::check_cooldown`] where a gate applies.
    pub fn record_write(&mut self, account: &str, now: Timestamp) {
        let stat = self.records.entry(account.to_string()).or_default();
        stat.count += 1;
        stat.last_write = now;
    }

    /// Credit a reporter's claimable balance, creating the record if absent.
    pub fn credit(&mut self, account: &str, amount: Amount) {
        let stat = self.records.entry(account.to_string()).or_default();
        stat.balance = stat.balance.saturating_add(amount);
    }

    /// Contributors ranked by cumulative count descending, ties broken by
    /// account name ascending for reproducibility.
    pub fn ranked_by_count(&self) -> Vec<(AccountId, u64)> {
        let mut ranked: Vec<(AccountId, u64)> = self
            .records
            .iter()
            .map(|(account, stat)| (account.clone(), stat.count))
            .collect();
        // BTreeMap iteration is already name-ascending, so a stable sort by
        // count keeps the name order within equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Approver check: true when the threshold is zero (open voting) or the
/// account's global cumulative count meets it. Unknown accounts fail unless
/// the threshold is zero.
pub fn is_approver(global: &StatsTable, approver_threshold: u64, account: &str) -> bool {
    if approver_threshold == 0 {
        return true;
    }
    global
        .get(account)
        .is_some_and(|stat| stat.count >= approver_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Timestamp = 55_000_000;

    #[test]
    fn test_first_write_creates_record() {
        let mut table = StatsTable::new();
        table.check_cooldown("alice", 100, COOLDOWN).expect("no record, no gate");
        table.record_write("alice", 100);

        let stat = table.get("alice").expect("record created");
        assert_eq!(stat.count, 1);
        assert_eq!(stat.last_write, 100);
        assert_eq!(stat.balance, 0);
    }

    #[test]
    fn test_cooldown_rejects_then_accepts() {
        let mut table = StatsTable::new();
        table.record_write("alice", 1_000);

        assert!(matches!(
            table.check_cooldown("alice", 1_000 + COOLDOWN - 1, COOLDOWN),
            Err(EngineError::Cooldown)
        ));
        table
            .check_cooldown("alice", 1_000 + COOLDOWN, COOLDOWN)
            .expect("exact boundary passes");

        table.record_write("alice", 1_000 + COOLDOWN);
        assert_eq!(table.get("alice").map(|s| s.count), Some(2));
    }

    #[test]
    fn test_ranked_by_count_ties_by_name() {
        let mut table = StatsTable::new();
        for _ in 0..3 {
            table.record_write("carol", 1);
        }
        for _ in 0..5 {
            table.record_write("alice", 1);
        }
        for _ in 0..3 {
            table.record_write("bob", 1);
        }

        let ranked = table.ranked_by_count();
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
        assert_eq!(ranked[0].1, 5);
    }

    #[test]
    fn test_credit_creates_record() {
        let mut table = StatsTable::new();
        table.credit("alice", 300);
        table.credit("alice", 200);
        assert_eq!(table.get("alice").map(|s| s.balance), Some(500));
        assert_eq!(table.get("alice").map(|s| s.count), Some(0));
    }

    #[test]
    fn test_is_approver() {
        let mut table = StatsTable::new();
        table.record_write("alice", 1);

        assert!(is_approver(&table, 0, "anyone"));
        assert!(is_approver(&table, 1, "alice"));
        assert!(!is_approver(&table, 2, "alice"));
        assert!(!is_approver(&table, 1, "mallory"));
    }
}
