//! Fixed-capacity datapoint ring with a streaming median.
//!
//! Every pair owns one ring of exactly `window` slots, pre-allocated
//! zero-valued at proposal time; there is no empty state and the length
//! never changes. An insert overwrites the oldest slot *by timestamp* (not
//! by insertion order — a scan, so out-of-order slot reuse is tolerated)
//! and recomputes the median over the whole window. Window sizes are small,
//! fixed, and odd, so the per-insert cost is bounded and the middle element
//! is exact.

use serde::{Deserialize, Serialize};

use auspex_types::{AccountId, Amount, Timestamp};

/// One observation slot: reporter, value, the median computed when the slot
/// was written, and the write timestamp.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Reporter that wrote this slot; empty until first written.
    pub reporter: AccountId,
    /// Observed value.
    pub value: Amount,
    /// Median over the full window at the time this slot was written.
    pub median: Amount,
    /// Write timestamp; zero for never-written slots.
    pub timestamp: Timestamp,
}

/// A fixed-size ring of datapoints for one pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatapointRing {
    slots: Vec<Datapoint>,
}

impl DatapointRing {
    /// Create a ring of `window` zero-valued slots.
    pub fn new(window: usize) -> Self {
        Self {
            slots: vec![Datapoint::default(); window],
        }
    }

    /// Number of slots; constant for the ring's lifetime.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A ring is never empty, but the conventional pairing is provided.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in physical order.
    pub fn slots(&self) -> &[Datapoint] {
        &self.slots
    }

    /// The most recently written slot, or `None` before the first write.
    pub fn latest(&self) -> Option<&Datapoint> {
        self.slots
            .iter()
            .filter(|d| d.timestamp > 0)
            .max_by_key(|d| d.timestamp)
    }

    /// Overwrite the oldest-by-timestamp slot (first such slot on ties) with
    /// the new observation, recompute the median over all slots, store it in
    /// the freshly written slot, and return it.
    pub fn insert(&mut self, reporter: &str, value: Amount, now: Timestamp) -> Amount {
        let oldest = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, d)| d.timestamp)
            .map(|(i, _)| i)
            .unwrap_or(0);

        self.slots[oldest] = Datapoint {
            reporter: reporter.to_string(),
            value,
            median: 0,
            timestamp: now,
        };

        let mut values: Vec<Amount> = self.slots.iter().map(|d| d.value).collect();
        values.sort_unstable();
        let median = values[values.len() / 2];

        self.slots[oldest].median = median;
        median
    }
}
