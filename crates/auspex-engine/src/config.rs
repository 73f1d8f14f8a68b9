//! Global configuration: tunable constants plus two engine-wide running
//! totals. One value per engine, threaded explicitly into every operation
//! that needs it; there is no ambient global state.

use serde::{Deserialize, Serialize};

use auspex_types::{Amount, Timestamp};

use crate::{EngineError, Result};

/// Default datapoint window size per pair.
pub const DEFAULT_WINDOW: u64 = 21;

/// Default write cooldown in microseconds (55 seconds).
pub const DEFAULT_WRITE_COOLDOWN: Timestamp = 55_000_000;

/// Default producer-ranking cutoff for oracle qualification.
pub const DEFAULT_MINIMUM_RANK: u64 = 105;

/// Default cumulative write count required to vote as an approving oracle.
pub const DEFAULT_APPROVER_THRESHOLD: u64 = 1;

/// Default number of approving oracles required to activate a pair.
pub const DEFAULT_APPROVING_ORACLES: u64 = 1;

/// Default number of approving custodians required to activate a pair.
pub const DEFAULT_APPROVING_CUSTODIANS: u64 = 1;

/// Default maximum number of reporters paid per distribution.
pub const DEFAULT_PAID: u64 = 21;

/// Tunable parameters accepted by `configure`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInput {
    /// Datapoint ring size per pair. Must be odd and positive.
    pub datapoints_per_instrument: u64,
    /// Minimum interval between writes from the same reporter, microseconds.
    pub write_cooldown: Timestamp,
    /// A reporter qualifies if it appears within the first
    /// `minimum_rank + 1` entries of the producer ranking.
    pub minimum_rank: u64,
    /// Cumulative global write count required to vote as an approving
    /// oracle; zero disables the check.
    pub approver_threshold: u64,
    /// Oracle votes required to activate a pair.
    pub approving_oracles_threshold: u64,
    /// Custodian votes required to activate a pair.
    pub approving_custodians_threshold: u64,
    /// Maximum number of reporters paid per reward distribution.
    pub paid: u64,
}

impl ConfigInput {
    /// Validate the invariants every tunable must satisfy.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidConfig`] if any field is zero, or if the
    ///   window size is even
    pub fn validate(&self) -> Result<()> {
        let positives = [
            ("datapoints_per_instrument", self.datapoints_per_instrument),
            ("write_cooldown", self.write_cooldown),
            ("minimum_rank", self.minimum_rank),
            ("approving_oracles_threshold", self.approving_oracles_threshold),
            (
                "approving_custodians_threshold",
                self.approving_custodians_threshold,
            ),
            ("paid", self.paid),
        ];
        for (field, value) in positives {
            if value == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{field} must be positive"
                )));
            }
        }
        // approver_threshold of zero is meaningful: it opens approval voting
        // to every account.
        if self.datapoints_per_instrument % 2 == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "window size must be odd, got {}",
                self.datapoints_per_instrument
            )));
        }
        Ok(())
    }
}

impl Default for ConfigInput {
    fn default() -> Self {
        Self {
            datapoints_per_instrument: DEFAULT_WINDOW,
            write_cooldown: DEFAULT_WRITE_COOLDOWN,
            minimum_rank: DEFAULT_MINIMUM_RANK,
            approver_threshold: DEFAULT_APPROVER_THRESHOLD,
            approving_oracles_threshold: DEFAULT_APPROVING_ORACLES,
            approving_custodians_threshold: DEFAULT_APPROVING_CUSTODIANS,
            paid: DEFAULT_PAID,
        }
    }
}

/// Global configuration singleton: the current tunables plus running totals
/// that survive reconfiguration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Datapoint ring size per pair.
    pub datapoints_per_instrument: u64,
    /// Write cooldown in microseconds.
    pub write_cooldown: Timestamp,
    /// Producer-ranking cutoff for qualification.
    pub minimum_rank: u64,
    /// Write count required to vote as an approving oracle.
    pub approver_threshold: u64,
    /// Oracle votes required to activate a pair.
    pub approving_oracles_threshold: u64,
    /// Custodian votes required to activate a pair.
    pub approving_custodians_threshold: u64,
    /// Maximum reporters paid per distribution.
    pub paid: u64,
    /// Total datapoints accepted since the engine was created.
    pub total_datapoints: u64,
    /// Total amount paid out through claims.
    pub total_claimed: Amount,
}

impl GlobalConfig {
    /// Replace the tunables, preserving the running totals.
    pub fn apply(&mut self, input: ConfigInput) {
        self.datapoints_per_instrument = input.datapoints_per_instrument;
        self.write_cooldown = input.write_cooldown;
        self.minimum_rank = input.minimum_rank;
        self.approver_threshold = input.approver_threshold;
        self.approving_oracles_threshold = input.approving_oracles_threshold;
        self.approving_custodians_threshold = input.approving_custodians_threshold;
        self.paid = input.paid;
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            datapoints_per_instrument: DEFAULT_WINDOW,
            write_cooldown: DEFAULT_WRITE_COOLDOWN,
            minimum_rank: DEFAULT_MINIMUM_RANK,
            approver_threshold: DEFAULT_APPROVER_THRESHOLD,
            approving_oracles_threshold: DEFAULT_APPROVING_ORACLES,
            approving_custodians_threshold: DEFAULT_APPROVING_CUSTODIANS,
            paid: DEFAULT_PAID,
            total_datapoints: 0,
            total_claimed: 0,
        }
    }
}
