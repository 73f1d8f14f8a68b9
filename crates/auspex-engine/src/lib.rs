//! # auspex-engine
//!
//! Decentralized price-oracle aggregation and incentive engine.
//!
//! Independent reporters periodically submit price observations for named
//! pairs; the engine keeps a fixed-capacity rolling window per pair, derives
//! a streaming median as the consensus value, rate-limits and ranks
//! reporters, and redistributes incoming token payments to reporters in
//! proportion to their contribution. A secondary commit-reveal subsystem
//! chains reporters' revealed secrets into a multiparty integrity beacon.
//!
//! The engine is synchronous and transactional: every operation validates
//! all preconditions before mutating anything, so a rejected request has
//! zero effect. Persistence, signer authorization, producer ranking, and
//! token transfers are the host's collaborators, not the engine's concern.
//!
//! ## Modules
//!
//! - [`config`] — global tunables and running totals
//! - [`rank`] — oracle qualification against an external producer ranking
//! - [`stats`] — per-reporter write stats, cooldowns, claimable balances
//! - [`window`] — fixed-capacity datapoint ring and streaming median
//! - [`beacon`] — commit-reveal hash chain across reporters
//! - [`pairs`] — pair proposal, voting, activation, and cancellation
//! - [`rewards`] — proportional reward distribution and claims
//! - [`payments`] — incoming transfer routing and the donation ledger
//! - [`engine`] — the [`Engine`] facade owning all tables

pub mod beacon;
pub mod config;
pub mod engine;
pub mod pairs;
pub mod payments;
pub mod rank;
pub mod rewards;
pub mod stats;
pub mod window;

pub use engine::Engine;

/// Error types for engine operations.
///
/// Every variant is a precondition failure detected before any mutation;
/// the failing request is rejected with no partial state change.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Caller is not the engine authority (or, for cancellation, neither the
    /// authority nor the proposer).
    #[error("unauthorized caller")]
    Unauthorized,

    /// Reporter is not within the qualifying prefix of the producer ranking.
    #[error("account is not a qualified oracle")]
    NotQualified,

    /// Write attempted before the cooldown interval elapsed.
    #[error("write cooldown has not elapsed")]
    Cooldown,

    /// No pair with the given name exists.
    #[error("pair not found: {0}")]
    PairNotFound(String),

    /// A pair with the given name already exists.
    #[error("pair already exists: {0}")]
    PairExists(String),

    /// The pair exists but has not been activated.
    #[error("pair not active: {0}")]
    PairNotActive(String),

    /// The operation only applies to inactive pairs.
    #[error("pair is already active: {0}")]
    PairActive(String),

    /// Pair name is malformed or reserved.
    #[error("invalid pair name: {0}")]
    InvalidPairName(String),

    /// A write request carried no quotes.
    #[error("write request carries no quotes")]
    EmptyQuotes,

    /// Quote value outside the pair's configured bounds.
    #[error("value {value} outside configured bounds [{min}, {max}]")]
    InvalidRange {
        /// The rejected value.
        value: u64,
        /// Lower bound, inclusive.
        min: u64,
        /// Upper bound, inclusive.
        max: u64,
    },

    /// Reveal does not hash to the prior commitment.
    #[error("reveal does not match prior commitment")]
    HashMismatch,

    /// First-ever commitment must carry an empty reveal.
    #[error("first commitment must carry an empty reveal")]
    InvalidReveal,

    /// Account already voted for this pair in every list it qualifies for.
    #[error("account has already voted")]
    AlreadyVoted,

    /// Account is neither a custodian nor a qualified approver.
    #[error("account is not authorized to vote")]
    NotAuthorized,

    /// Account is in neither approval list of the pair.
    #[error("account is not voting for this pair")]
    NotVoting,

    /// Claim with a zero balance or from an unknown reporter.
    #[error("nothing to claim")]
    NothingToClaim,

    /// Reward distribution over a scope with zero total contribution.
    #[error("no eligible contributors in scope")]
    DivisionByZero,

    /// Custodian already present.
    #[error("custodian already exists: {0}")]
    CustodianExists(String),

    /// Custodian not present.
    #[error("not a custodian: {0}")]
    NotCustodian(String),

    /// Configuration input violates an invariant.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Incoming transfer with a zero amount.
    #[error("transfer amount is zero")]
    ZeroAmount,
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
