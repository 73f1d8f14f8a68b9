//! Commit-reveal hash chain: the multiparty integrity beacon.
//!
//! Each reporter holds at most one live commitment. A new commitment is only
//! accepted together with a reveal that hashes to the reporter's previous
//! commitment (the very first carries an empty reveal). Verified reveals are
//! chained across *distinct* reporters: the new multiparty digest is
//! `sha256(hex(prev.multiparty) || reveal)` where `prev` is the most recent
//! commit by a different reporter with a non-empty reveal. Skipping the
//! reporter's own entries keeps any single reporter from fully controlling
//! the beacon's entropy, and committing before revealing keeps a reporter
//! from choosing its value after seeing others' reveals in the same round.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::{Digest as _, Sha256};

use auspex_types::{AccountId, Digest, Timestamp, NULL_DIGEST};

use crate::{EngineError, Result};

/// SHA-256 of a byte string.
pub fn sha256(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// One commitment record in the chain.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCommit {
    /// Strictly increasing sequence number; chain order is `seq` order.
    pub seq: u64,
    /// Committing reporter.
    pub reporter: AccountId,
    /// The committed hash, to be matched by a future reveal.
    #[serde_as(as = "serde_with::hex::Hex")]
    pub commitment: Digest,
    /// The revealed value for the *previous* commitment; empty on the first.
    pub reveal: String,
    /// Multiparty digest chained across distinct reporters' reveals.
    #[serde_as(as = "serde_with::hex::Hex")]
    pub multiparty: Digest,
    /// Commit timestamp.
    pub timestamp: Timestamp,
}

/// Append-ordered log of commitments, at most one live per reporter.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommitLog {
    entries: Vec<HashCommit>,
    next_seq: u64,
}

impl CommitLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reporter's live commitment, if any.
    pub fn commit_for(&self, reporter: &str) -> Option<&HashCommit> {
        self.entries.iter().find(|e| e.reporter == reporter)
    }

    /// All live commitments in chain order.
    pub fn entries(&self) -> &[HashCommit] {
        &self.entries
    }

    /// Commit a new hash, revealing the previous commitment if one exists.
    ///
    /// Returns `true` when a prior commitment was revealed and replaced (the
    /// engine then credits the reporter's global write stat), `false` for a
    /// first-ever commitment.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Cooldown`] if the prior commitment is newer than
    ///   `cooldown`
    /// - [`EngineError::HashMismatch`] if `sha256(reveal)` does not equal
    ///   the prior commitment
    /// - [`EngineError::InvalidReveal`] if there is no prior commitment and
    ///   the reveal is non-empty
    pub fn write_hash(
        &mut self,
        reporter: &str,
        commitment: Digest,
        reveal: &str,
        now: Timestamp,
        cooldown: Timestamp,
    ) -> Result<bool> {
        match self.entries.iter().position(|e| e.reporter == reporter) {
            Some(idx) => {
                let prior = &self.entries[idx];
                if now < prior.timestamp.saturating_add(cooldown) {
                    return Err(EngineError::Cooldown);
                }
                if sha256(reveal.as_bytes()) != prior.commitment {
                    return Err(EngineError::HashMismatch);
                }
                let multiparty = self.chain_digest(reporter, reveal);
                self.entries.remove(idx);
                self.push(reporter, commitment, reveal, multiparty, now);
                tracing::debug!(reporter, "beacon: reveal verified and chained");
                Ok(true)
            }
            None => {
                if !reveal.is_empty() {
                    return Err(EngineError::InvalidReveal);
                }
                self.push(reporter, commitment, "", NULL_DIGEST, now);
                tracing::debug!(reporter, "beacon: first commitment recorded");
                Ok(false)
            }
        }
    }

    /// Drop the reporter's live commitment. Idempotent: dropping a
    /// commitment that does not exist is a no-op.
    pub fn forfeit(&mut self, reporter: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.reporter != reporter);
        if self.entries.len() < before {
            tracing::debug!(reporter, "beacon: commitment forfeited");
        }
    }

    /// Remove every commitment.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // Most recent commit by a different reporter with a non-empty reveal,
    // chained with this reveal; the null digest anchors the chain.
    fn chain_digest(&self, reporter: &str, reveal: &str) -> Digest {
        for entry in self.entries.iter().rev() {
            if entry.reporter != reporter && !entry.reveal.is_empty() {
                let mut input = hex::encode(entry.multiparty);
                input.push_str(reveal);
                return sha256(input.as_bytes());
            }
        }
        NULL_DIGEST
    }

    fn push(
        &mut self,
        reporter: &str,
        commitment: Digest,
        reveal: &str,
        multiparty: Digest,
        now: Timestamp,
    ) {
        self.entries.push(HashCommit {
            seq: self.next_seq,
            reporter: reporter.to_string(),
            commitment,
            reveal: reveal.to_string(),
            multiparty,
            timestamp: now,
        });
        self.next_seq += 1;
    }
}
