//! Oracle qualification against an externally maintained producer ranking.
//!
//! The ranking itself (descending vote weight, external tie order) is a
//! collaborator behind the [`ProducerRanking`] trait; the engine only scans
//! a bounded prefix of it. [`StaticRanking`] wraps a fixed list for tests
//! and bootstrap hosts.

use auspex_types::AccountId;

/// Externally supplied producer ranking, ordered descending by vote weight
/// with ties broken by the external ranking's own order.
pub trait ProducerRanking {
    /// The first `limit` producers of the ranking, best first. Fewer may be
    /// returned if the ranking is shorter than `limit`.
    fn top_producers(&self, limit: usize) -> Vec<AccountId>;
}

/// A fixed producer list, already ordered. Used by tests and by hosts that
/// refresh the ranking out of band.
#[derive(Clone, Debug, Default)]
pub struct StaticRanking {
    producers: Vec<AccountId>,
}

impl StaticRanking {
    /// Wrap an already-ordered producer list.
    pub fn new(producers: Vec<AccountId>) -> Self {
        Self { producers }
    }
}

impl ProducerRanking for StaticRanking {
    fn top_producers(&self, limit: usize) -> Vec<AccountId> {
        self.producers.iter().take(limit).cloned().collect()
    }
}

/// Check whether `account` qualifies as an oracle: it must appear within the
/// first `minimum_rank + 1` entries of the ranking. Scans at most that
/// prefix and fails closed — an account outside it (or absent entirely) is
/// not qualified. No side effects.
pub fn is_qualified(ranking: &dyn ProducerRanking, account: &str, minimum_rank: u64) -> bool {
    let limit = (minimum_rank as usize).saturating_add(1);
    ranking
        .top_producers(limit)
        .iter()
        .take(limit)
        .any(|p| p == account)
}
