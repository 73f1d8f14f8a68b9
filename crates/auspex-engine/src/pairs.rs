//! Pair lifecycle: proposal, approval voting, activation, cancellation.
//!
//! A pair is created inactive by a proposal and activates exactly once, when
//! both the custodian and the oracle approval lists reach their configured
//! thresholds. Activation is monotonic; only inactive pairs can be voted on,
//! unvoted, or cancelled.

use serde::{Deserialize, Serialize};

use auspex_types::pair::PairSpec;
use auspex_types::{AccountId, Amount, PairId, Timestamp};

use crate::{EngineError, Result};

/// Outcome of a successful vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Vote recorded; thresholds not yet met.
    Recorded,
    /// This vote met both thresholds and activated the pair.
    Activated,
}

/// One tracked pair and its approval state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pair {
    /// The proposing account; may cancel while inactive.
    pub proposer: AccountId,
    /// Whether the pair accepts writes. Monotonic: never reverts.
    pub active: bool,
    /// Whether the funded bounty has been exhausted; once true, payments
    /// tagged with this pair become donations.
    pub bounty_awarded: bool,
    /// Whether a custodian has voted on this pair.
    pub custodian_edited: bool,
    /// Accumulated, not-yet-dripped bounty balance.
    pub bounty_balance: Amount,
    /// Proposal metadata: name, symbols, precision, bounds.
    pub spec: PairSpec,
    /// Custodians that approved, in vote order.
    pub approving_custodians: Vec<AccountId>,
    /// Qualified oracles that approved, in vote order.
    pub approving_oracles: Vec<AccountId>,
    /// Proposal timestamp.
    pub proposed_at: Timestamp,
}

impl Pair {
    /// Create a freshly proposed, inactive pair.
    pub fn new(proposer: &str, spec: PairSpec, now: Timestamp) -> Self {
        Self {
            proposer: proposer.to_string(),
            active: false,
            bounty_awarded: false,
            custodian_edited: false,
            bounty_balance: 0,
            spec,
            approving_custodians: Vec::new(),
            approving_oracles: Vec::new(),
            proposed_at: now,
        }
    }

    /// The pair's name.
    pub fn name(&self) -> &PairId {
        &self.spec.name
    }

    /// Record an approval vote. Custodianship and approver status are
    /// resolved by the caller; both lists may gain the account in the same
    /// vote, but at least one must.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PairActive`] if the pair is already active
    /// - [`EngineError::AlreadyVoted`] if the account is already present in
    ///   every list it qualifies for
    /// - [`EngineError::NotAuthorized`] if the account qualifies for neither
    ///   list
    pub fn record_vote(
        &mut self,
        account: &str,
        is_custodian: bool,
        is_approver: bool,
        custodians_threshold: u64,
        oracles_threshold: u64,
    ) -> Result<VoteOutcome> {
        if self.active {
            return Err(EngineError::PairActive(self.spec.name.clone()));
        }

        let mut recorded = false;
        let mut duplicate = false;

        if is_custodian {
            if self.approving_custodians.iter().any(|a| a == account) {
                duplicate = true;
            } else {
                self.approving_custodians.push(account.to_string());
                self.custodian_edited = true;
                recorded = true;
            }
        }
        if is_approver {
            if self.approving_oracles.iter().any(|a| a == account) {
                duplicate = true;
            } else {
                self.approving_oracles.push(account.to_string());
                recorded = true;
            }
        }

        if !recorded {
            return Err(if duplicate {
                EngineError::AlreadyVoted
            } else {
                EngineError::NotAuthorized
            });
        }

        tracing::debug!(
            pair = %self.spec.name,
            account,
            custodians = self.approving_custodians.len(),
            oracles = self.approving_oracles.len(),
            "pair vote recorded"
        );

        if self.approving_custodians.len() as u64 >= custodians_threshold
            && self.approving_oracles.len() as u64 >= oracles_threshold
        {
            self.active = true;
            tracing::info!(pair = %self.spec.name, "pair activated");
            return Ok(VoteOutcome::Activated);
        }
        Ok(VoteOutcome::Recorded)
    }

    /// Withdraw an approval vote from whichever list contains the account.
    ///
    /// # Errors
    ///
    /// - [`EngineError::PairActive`] if the pair is already active
    /// - [`EngineError::NotVoting`] if the account is in neither list
    pub fn remove_vote(&mut self, account: &str) -> Result<()> {
        if self.active {
            return Err(EngineError::PairActive(self.spec.name.clone()));
        }

        let custodians_before = self.approving_custodians.len();
        let oracles_before = self.approving_oracles.len();
        self.approving_custodians.retain(|a| a != account);
        self.approving_oracles.retain(|a| a != account);

        if self.approving_custodians.len() == custodians_before
            && self.approving_oracles.len() == oracles_before
        {
            return Err(EngineError::NotVoting);
        }

        tracing::debug!(pair = %self.spec.name, account, "pair vote withdrawn");
        Ok(())
    }
}
