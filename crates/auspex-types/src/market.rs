//! Records crossing the engine boundary on the hot paths: submitted quotes
//! and outbound transfer requests.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, PairId};

/// One price observation submitted by a reporter. A single `write` request
/// may carry several quotes for distinct pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Target pair name.
    pub pair: PairId,
    /// Observed value, scaled by the pair's quoted precision.
    pub value: Amount,
}

/// A transfer the engine asks the host ledger to execute. Fire-and-forget:
/// the engine's own state (balance zeroed, totals bumped) is final once the
/// request is returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Receiving account.
    pub to: AccountId,
    /// Amount in base units.
    pub amount: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_serde_round_trip() {
        let quote = Quote {
            pair: "eosusd".to_string(),
            value: 7150,
        };
        let json = serde_json::to_string(&quote).expect("serialize");
        let back: Quote = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, quote);
    }

    #[test]
    fn test_boundary_types_visible_at_crate_root() {
        // Engine and host code import these from the crate root.
        let quote: crate::Quote = Quote {
            pair: "eosusd".to_string(),
            value: 1,
        };
        let request: crate::TransferRequest = TransferRequest {
            to: "alice".to_string(),
            amount: quote.value,
        };
        assert_eq!(request.amount, 1);
    }
}
