//! The engine facade: one owner for every table, one method per external
//! operation.
//!
//! Execution is single-threaded and transactional per request. Every method
//! validates all preconditions before its first mutation, so a failing
//! request leaves the engine untouched; callers arrive pre-authenticated
//! and supply transaction time explicitly.

use std::collections::{BTreeMap, BTreeSet};

use auspex_types::pair::PairSpec;
use auspex_types::{
    AccountId, Amount, Digest, PairId, Quote, Timestamp, TransferRequest, TypeError, SYSTEM_SCOPE,
};

use crate::beacon::{CommitLog, HashCommit};
use crate::config::{ConfigInput, GlobalConfig};
use crate::pairs::Pair;
use crate::payments::{self, Donation, DonationLedger, Route};
use crate::rank::{self, ProducerRanking};
use crate::stats::{self, ReporterStat, StatsTable};
use crate::window::{Datapoint, DatapointRing};
use crate::{rewards, EngineError, Result};

/// Amount dripped from a pair's bounty to the writer per accepted datapoint.
pub const BOUNTY_DRIP: Amount = 1;

/// The aggregation-and-incentive engine.
pub struct Engine {
    authority: AccountId,
    config: GlobalConfig,
    custodians: Vec<AccountId>,
    pairs: BTreeMap<PairId, Pair>,
    rings: BTreeMap<PairId, DatapointRing>,
    pair_stats: BTreeMap<PairId, StatsTable>,
    global_stats: StatsTable,
    commits: CommitLog,
    donations: DonationLedger,
}

impl Engine {
    /// Create an engine with default configuration and no pairs.
    ///
    /// `authority` is the account allowed to reconfigure, manage custodians,
    /// cancel any inactive pair, and reset the engine.
    pub fn new(authority: &str) -> Self {
        Self {
            authority: authority.to_string(),
            config: GlobalConfig::default(),
            custodians: Vec::new(),
            pairs: BTreeMap::new(),
            rings: BTreeMap::new(),
            pair_stats: BTreeMap::new(),
            global_stats: StatsTable::new(),
            commits: CommitLog::new(),
            donations: DonationLedger::new(),
        }
    }

    /// Submit a batch of quotes. All preconditions for every quote are
    /// checked before any mutation; the whole batch fails atomically.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyQuotes`] for an empty batch
    /// - [`EngineError::NotQualified`] if the reporter is outside the
    ///   ranking prefix
    /// - [`EngineError::PairNotFound`] / [`EngineError::PairNotActive`] for
    ///   an unknown or inactive target pair
    /// - [`EngineError::InvalidRange`] for a value outside the pair bounds
    /// - [`EngineError::Cooldown`] if the per-pair cooldown has not elapsed,
    ///   including a second quote for the same pair within the batch
    pub fn write(
        &mut self,
        ranking: &dyn ProducerRanking,
        reporter: &str,
        quotes: &[Quote],
        now: Timestamp,
    ) -> Result<()> {
        if quotes.is_empty() {
            return Err(EngineError::EmptyQuotes);
        }
        if !rank::is_qualified(ranking, reporter, self.config.minimum_rank) {
            return Err(EngineError::NotQualified);
        }

        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for quote in quotes {
            let pair = self
                .pairs
                .get(&quote.pair)
                .ok_or_else(|| EngineError::PairNotFound(quote.pair.clone()))?;
            if !pair.active {
                return Err(EngineError::PairNotActive(quote.pair.clone()));
            }
            if quote.value < pair.spec.min_value || quote.value > pair.spec.max_value {
                return Err(EngineError::InvalidRange {
                    value: quote.value,
                    min: pair.spec.min_value,
                    max: pair.spec.max_value,
                });
            }
            // A second quote for the same pair inside one batch would land
            // within its own cooldown interval.
            if !seen.insert(quote.pair.as_str()) {
                return Err(EngineError::Cooldown);
            }
            if let Some(table) = self.pair_stats.get(&quote.pair) {
                table.check_cooldown(reporter, now, self.config.write_cooldown)?;
            }
        }

        for quote in quotes {
            self.pair_stats
                .entry(quote.pair.clone())
                .or_default()
                .record_write(reporter, now);
            self.global_stats.record_write(reporter, now);

            if let Some(pair) = self.pairs.get_mut(&quote.pair) {
                if pair.bounty_balance >= BOUNTY_DRIP {
                    pair.bounty_balance -= BOUNTY_DRIP;
                    self.global_stats.credit(reporter, BOUNTY_DRIP);
                } else if !pair.bounty_awarded {
                    pair.bounty_awarded = true;
                    tracing::info!(pair = %quote.pair, "bounty exhausted");
                }
            }

            if let Some(ring) = self.rings.get_mut(&quote.pair) {
                let median = ring.insert(reporter, quote.value, now);
                tracing::trace!(
                    pair = %quote.pair,
                    reporter,
                    value = quote.value,
                    median,
                    "datapoint recorded"
                );
            }
            self.config.total_datapoints += 1;
        }
        Ok(())
    }

    /// Commit a new hash to the beacon, revealing the prior commitment if
    /// one exists. A verified reveal also counts as a global write.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotQualified`] if the reporter is outside the
    ///   ranking prefix
    /// - errors of [`CommitLog::write_hash`]
    pub fn write_hash(
        &mut self,
        ranking: &dyn ProducerRanking,
        reporter: &str,
        commitment: Digest,
        reveal: &str,
        now: Timestamp,
    ) -> Result<()> {
        if !rank::is_qualified(ranking, reporter, self.config.minimum_rank) {
            return Err(EngineError::NotQualified);
        }
        let revealed =
            self.commits
                .write_hash(reporter, commitment, reveal, now, self.config.write_cooldown)?;
        if revealed {
            self.global_stats.record_write(reporter, now);
        }
        Ok(())
    }

    /// Drop the reporter's live beacon commitment. Idempotent.
    pub fn forfeit_hash(&mut self, reporter: &str) {
        self.commits.forfeit(reporter);
    }

    /// Claim the reporter's full claimable balance.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NothingToClaim`] if the reporter is unknown or the
    ///   balance is zero
    pub fn claim(&mut self, reporter: &str, now: Timestamp) -> Result<TransferRequest> {
        let request = rewards::claim(&mut self.global_stats, reporter, now)?;
        self.config.total_claimed = self.config.total_claimed.saturating_add(request.amount);
        Ok(request)
    }

    /// Propose a new pair. The pair is created inactive with a pre-allocated
    /// datapoint ring sized from the current configuration.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidPairName`] for a malformed or reserved name
    /// - [`EngineError::InvalidConfig`] for inverted quote bounds
    /// - [`EngineError::PairExists`] on a name collision
    pub fn propose_pair(&mut self, proposer: &str, spec: PairSpec, now: Timestamp) -> Result<()> {
        spec.validate().map_err(|e| match e {
            TypeError::InvalidName(name) => EngineError::InvalidPairName(name),
            TypeError::InvalidBounds { min, max } => {
                EngineError::InvalidConfig(format!("quote bounds inverted: {min} > {max}"))
            }
        })?;
        if spec.name == SYSTEM_SCOPE {
            return Err(EngineError::InvalidPairName(spec.name));
        }
        if self.pairs.contains_key(&spec.name) {
            return Err(EngineError::PairExists(spec.name));
        }

        let name = spec.name.clone();
        let window = self.config.datapoints_per_instrument as usize;
        self.pairs.insert(name.clone(), Pair::new(proposer, spec, now));
        self.rings.insert(name.clone(), DatapointRing::new(window));
        self.pair_stats.insert(name.clone(), StatsTable::new());

        tracing::info!(pair = %name, proposer, "pair proposed");
        Ok(())
    }

    /// Vote to approve an inactive pair. Custodians land in the custodian
    /// list, qualified approvers in the oracle list; meeting both thresholds
    /// activates the pair exactly once.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PairNotFound`] for an unknown pair
    /// - errors of [`Pair::record_vote`]
    pub fn vote_pair(&mut self, account: &str, name: &str) -> Result<()> {
        let is_custodian = self.custodians.iter().any(|c| c == account);
        let is_approver =
            stats::is_approver(&self.global_stats, self.config.approver_threshold, account);
        let custodians_threshold = self.config.approving_custodians_threshold;
        let oracles_threshold = self.config.approving_oracles_threshold;

        let pair = self
            .pairs
            .get_mut(name)
            .ok_or_else(|| EngineError::PairNotFound(name.to_string()))?;
        pair.record_vote(
            account,
            is_custodian,
            is_approver,
            custodians_threshold,
            oracles_threshold,
        )?;
        Ok(())
    }

    /// Withdraw an approval vote from an inactive pair.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PairNotFound`] for an unknown pair
    /// - errors of [`Pair::remove_vote`]
    pub fn unvote_pair(&mut self, account: &str, name: &str) -> Result<()> {
        let pair = self
            .pairs
            .get_mut(name)
            .ok_or_else(|| EngineError::PairNotFound(name.to_string()))?;
        pair.remove_vote(account)
    }

    /// Cancel an inactive pair, deleting it together with its datapoint
    /// ring and per-pair stats. Accumulated bounty is not refunded; the
    /// donation ledger keeps the audit trail.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PairNotFound`] for an unknown pair
    /// - [`EngineError::Unauthorized`] unless the caller is the engine
    ///   authority or the original proposer
    /// - [`EngineError::PairActive`] if the pair has activated
    pub fn cancel_pair(&mut self, caller: &str, name: &str, reason: &str) -> Result<()> {
        let pair = self
            .pairs
            .get(name)
            .ok_or_else(|| EngineError::PairNotFound(name.to_string()))?;
        if caller != self.authority && caller != pair.proposer {
            return Err(EngineError::Unauthorized);
        }
        if pair.active {
            return Err(EngineError::PairActive(name.to_string()));
        }

        self.pairs.remove(name);
        self.rings.remove(name);
        self.pair_stats.remove(name);
        tracing::info!(pair = name, caller, reason, "pair cancelled");
        Ok(())
    }

    /// Replace the configuration tunables. Running totals are preserved;
    /// the window size is frozen while any pair exists, since rings are
    /// pre-sized at proposal time.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthorized`] unless called by the authority
    /// - [`EngineError::InvalidConfig`] for invariant violations
    pub fn configure(&mut self, caller: &str, input: ConfigInput) -> Result<()> {
        if caller != self.authority {
            return Err(EngineError::Unauthorized);
        }
        input.validate()?;
        if input.datapoints_per_instrument != self.config.datapoints_per_instrument
            && !self.pairs.is_empty()
        {
            return Err(EngineError::InvalidConfig(
                "window size cannot change while pairs exist".to_string(),
            ));
        }
        self.config.apply(input);
        tracing::info!("configuration replaced");
        Ok(())
    }

    /// Add a custodian.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthorized`] unless called by the authority
    /// - [`EngineError::CustodianExists`] on a duplicate
    pub fn add_custodian(&mut self, caller: &str, name: &str) -> Result<()> {
        if caller != self.authority {
            return Err(EngineError::Unauthorized);
        }
        if self.custodians.iter().any(|c| c == name) {
            return Err(EngineError::CustodianExists(name.to_string()));
        }
        self.custodians.push(name.to_string());
        tracing::info!(custodian = name, "custodian added");
        Ok(())
    }

    /// Remove a custodian.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthorized`] unless called by the authority
    /// - [`EngineError::NotCustodian`] if absent
    pub fn remove_custodian(&mut self, caller: &str, name: &str) -> Result<()> {
        if caller != self.authority {
            return Err(EngineError::Unauthorized);
        }
        let before = self.custodians.len();
        self.custodians.retain(|c| c != name);
        if self.custodians.len() == before {
            return Err(EngineError::NotCustodian(name.to_string()));
        }
        tracing::info!(custodian = name, "custodian removed");
        Ok(())
    }

    /// Route an incoming payment: system transfers are ignored, payments
    /// naming a pair with an unawarded bounty accumulate into it, and
    /// everything else is a donation distributed over the matching scope.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ZeroAmount`] for a zero transfer
    /// - [`EngineError::DivisionByZero`] for a donation to a scope with no
    ///   contributors
    pub fn on_transfer(&mut self, from: &str, amount: Amount, memo: &str, now: Timestamp) -> Result<()> {
        if amount == 0 {
            return Err(EngineError::ZeroAmount);
        }
        match payments::route(memo, &self.pairs) {
            Route::System => {
                tracing::debug!(from, amount, "system transfer ignored");
                Ok(())
            }
            Route::Bounty(name) => {
                if let Some(pair) = self.pairs.get_mut(&name) {
                    pair.bounty_balance = pair.bounty_balance.saturating_add(amount);
                    tracing::debug!(
                        pair = %name,
                        from,
                        amount,
                        balance = pair.bounty_balance,
                        "bounty funded"
                    );
                }
                Ok(())
            }
            Route::PairDonation(name) => {
                let ranked = self
                    .pair_stats
                    .get(&name)
                    .map(|table| table.ranked_by_count())
                    .unwrap_or_default();
                self.distribute_donation(from, &name, &ranked, amount, now)
            }
            Route::GlobalDonation => {
                let ranked = self.global_stats.ranked_by_count();
                self.distribute_donation(from, SYSTEM_SCOPE, &ranked, amount, now)
            }
        }
    }

    /// Administrative reset for test and bootstrap hosts: wipes every table
    /// and restores the default configuration.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Unauthorized`] unless called by the authority
    pub fn clear(&mut self, caller: &str) -> Result<()> {
        if caller != self.authority {
            return Err(EngineError::Unauthorized);
        }
        self.custodians.clear();
        self.pairs.clear();
        self.rings.clear();
        self.pair_stats.clear();
        self.global_stats = StatsTable::new();
        self.commits.clear();
        self.donations.clear();
        self.config = GlobalConfig::default();
        tracing::info!("engine cleared");
        Ok(())
    }

    /// Current configuration and running totals.
    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Current custodian list, in addition order.
    pub fn custodians(&self) -> &[AccountId] {
        &self.custodians
    }

    /// Look up a pair by name.
    pub fn pair(&self, name: &str) -> Option<&Pair> {
        self.pairs.get(name)
    }

    /// A pair's datapoint ring in physical slot order.
    pub fn datapoints(&self, name: &str) -> Option<&[Datapoint]> {
        self.rings.get(name).map(|ring| ring.slots())
    }

    /// The consensus value of a pair: the median stored with its most
    /// recently written datapoint. `None` before the first write.
    pub fn median(&self, name: &str) -> Option<Amount> {
        self.rings.get(name)?.latest().map(|d| d.median)
    }

    /// A reporter's global-scope record.
    pub fn global_stat(&self, account: &str) -> Option<&ReporterStat> {
        self.global_stats.get(account)
    }

    /// A reporter's record within one pair's scope.
    pub fn pair_stat(&self, name: &str, account: &str) -> Option<&ReporterStat> {
        self.pair_stats.get(name)?.get(account)
    }

    /// A reporter's live beacon commitment.
    pub fn commit(&self, account: &str) -> Option<&HashCommit> {
        self.commits.commit_for(account)
    }

    /// The donation ledger in receipt order.
    pub fn donations(&self) -> &[Donation] {
        self.donations.entries()
    }

    fn distribute_donation(
        &mut self,
        from: &str,
        scope: &str,
        ranked: &[(AccountId, u64)],
        amount: Amount,
        now: Timestamp,
    ) -> Result<()> {
        let payouts = rewards::compute_payouts(ranked, self.config.paid, amount)?;
        self.donations.record(from, scope, amount, now);
        for (account, quota) in &payouts {
            self.global_stats.credit(account, *quota);
        }
        tracing::info!(
            scope,
            from,
            amount,
            recipients = payouts.len(),
            "donation distributed"
        );
        Ok(())
    }
}
