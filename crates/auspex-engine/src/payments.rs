//! Incoming transfer routing and the append-only donation ledger.
//!
//! A transfer's memo decides its fate: the reserved scope name marks a
//! system transfer (ignored); a memo naming an existing pair either feeds
//! that pair's bounty or, once the bounty is awarded, becomes a donation
//! distributed over that pair's contributors; anything else is a donation
//! to the global scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use auspex_types::{AccountId, Amount, PairId, Timestamp, SYSTEM_SCOPE};

use crate::pairs::Pair;

/// Where an incoming transfer goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// System transfer; accepted but ignored.
    System,
    /// Accumulate into the named pair's bounty.
    Bounty(PairId),
    /// Donation distributed over the named pair's contributors.
    PairDonation(PairId),
    /// Donation distributed over the global contributor pool.
    GlobalDonation,
}

/// Resolve the route for a transfer memo against the current pair table.
pub fn route(memo: &str, pairs: &BTreeMap<PairId, Pair>) -> Route {
    if memo == SYSTEM_SCOPE {
        return Route::System;
    }
    match pairs.get(memo) {
        Some(pair) if pair.bounty_awarded => Route::PairDonation(memo.to_string()),
        Some(_) => Route::Bounty(memo.to_string()),
        None => Route::GlobalDonation,
    }
}

/// One donation ledger entry. Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Strictly increasing sequence number.
    pub seq: u64,
    /// Donating account.
    pub donor: AccountId,
    /// Pair name, or the reserved scope name for global donations.
    pub scope: PairId,
    /// Donated amount.
    pub amount: Amount,
    /// Receipt timestamp.
    pub timestamp: Timestamp,
}

/// Append-only ledger of donations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DonationLedger {
    entries: Vec<Donation>,
    next_seq: u64,
}

impl DonationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a donation record.
    pub fn record(&mut self, donor: &str, scope: &str, amount: Amount, now: Timestamp) {
        self.entries.push(Donation {
            seq: self.next_seq,
            donor: donor.to_string(),
            scope: scope.to_string(),
            amount,
            timestamp: now,
        });
        self.next_seq += 1;
        tracing::debug!(donor, scope, amount, "donation recorded");
    }

    /// All donations in receipt order.
    pub fn entries(&self) -> &[Donation] {
        &self.entries
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auspex_types::pair::{AssetClass, PairSpec, SymbolInfo};

    fn pair(name: &str, bounty_awarded: bool) -> Pair {
        let spec = PairSpec {
            name: name.to_string(),
            base: SymbolInfo {
                symbol: "eos".to_string(),
                precision: 4,
                class: AssetClass::Crypto,
                contract: String::new(),
            },
            quote: SymbolInfo {
                symbol: "usd".to_string(),
                precision: 2,
                class: AssetClass::Fiat,
                contract: String::new(),
            },
            quoted_precision: 4,
            min_value: 0,
            max_value: Amount::MAX,
        };
        let mut pair = Pair::new("alice", spec, 1);
        pair.bounty_awarded = bounty_awarded;
        pair
    }

    #[test]
    fn test_routing() {
        let mut pairs = BTreeMap::new();
        pairs.insert("eosusd".to_string(), pair("eosusd", false));
        pairs.insert("btcusd".to_string(), pair("btcusd", true));

        assert_eq!(route("system", &pairs), Route::System);
        assert_eq!(route("eosusd", &pairs), Route::Bounty("eosusd".to_string()));
        assert_eq!(
            route("btcusd", &pairs),
            Route::PairDonation("btcusd".to_string())
        );
        assert_eq!(route("thanks!", &pairs), Route::GlobalDonation);
        assert_eq!(route("", &pairs), Route::GlobalDonation);
    }

    #[test]
    fn test_ledger_appends_in_order() {
        let mut ledger = DonationLedger::new();
        ledger.record("alice", "eosusd", 100, 10);
        ledger.record("bob", SYSTEM_SCOPE, 50, 20);

        let entries = ledger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].seq, 0);
        assert_eq!(entries[1].seq, 1);
        assert_eq!(entries[1].scope, SYSTEM_SCOPE);
    }
}
