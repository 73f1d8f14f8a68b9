//! # auspex-types
//!
//! Shared domain types used across the auspex workspace.
//!
//! The engine itself lives in `auspex-engine`; this crate only carries the
//! vocabulary both the engine and its hosts speak: account and pair
//! identifiers, amounts, timestamps, digests, and the pair/quote/transfer
//! records that cross the engine boundary.

pub mod market;
pub mod pair;

pub use market::{Quote, TransferRequest};

/// A pre-authenticated account name. The host's dispatch layer resolves and
/// verifies the signer before any engine call; the engine treats the name as
/// an opaque, already-trusted identity.
pub type AccountId = String;

/// A pair (instrument) name.
pub type PairId = String;

/// A token amount in base units.
pub type Amount = u64;

/// Microseconds since the Unix epoch. The engine carries no clock; hosts
/// supply transaction time on every mutating call.
pub type Timestamp = u64;

/// A 32-byte SHA-256 digest.
pub type Digest = [u8; 32];

/// The all-zero digest, used where no chain predecessor exists.
pub const NULL_DIGEST: Digest = [0u8; 32];

/// Reserved scope name. Pairs may not take this name; transfers tagged with
/// it are system transfers, and global-scope donations are ledgered under it.
pub const SYSTEM_SCOPE: &str = "system";

/// Maximum length of a pair name.
pub const MAX_PAIR_NAME_LEN: usize = 12;

/// Error type for domain-type validation.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// Pair name is empty, too long, or contains invalid characters.
    #[error("invalid pair name: {0}")]
    InvalidName(String),

    /// Quote bounds are inverted (min above max).
    #[error("invalid quote bounds: min {min} exceeds max {max}")]
    InvalidBounds {
        /// Lower bound.
        min: Amount,
        /// Upper bound.
        max: Amount,
    },
}

/// Convenience result type for domain-type validation.
pub type Result<T> = std::result::Result<T, TypeError>;
