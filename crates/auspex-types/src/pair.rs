//! Pair (instrument) metadata supplied at proposal time.

use serde::{Deserialize, Serialize};

use crate::{Amount, PairId, Result, TypeError, MAX_PAIR_NAME_LEN};

/// The class of asset on one side of a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// A fiat currency, quoted from off-chain markets.
    Fiat,
    /// A cryptocurrency native to some chain.
    Crypto,
    /// A token issued by a contract account.
    Token,
    /// An equity or other traditional instrument.
    Equity,
}

/// One side of a pair: symbol code, precision, and (for tokens) the issuing
/// contract account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Symbol code, e.g. `"usd"` or `"eos"`.
    pub symbol: String,
    /// Number of decimal places the symbol is quoted with.
    pub precision: u8,
    /// Asset class of this side.
    pub class: AssetClass,
    /// Issuing contract account, empty for non-token assets.
    pub contract: String,
}

/// Everything a proposer supplies to describe a new pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSpec {
    /// Pair name, lowercase `[a-z1-5.]`, 1 to 12 characters.
    pub name: PairId,
    /// Base side of the pair.
    pub base: SymbolInfo,
    /// Quote side of the pair.
    pub quote: SymbolInfo,
    /// Decimal places of submitted quote values.
    pub quoted_precision: u8,
    /// Smallest acceptable quote value, inclusive.
    pub min_value: Amount,
    /// Largest acceptable quote value, inclusive.
    pub max_value: Amount,
}

impl PairSpec {
    /// Validate the spec's name and bounds.
    ///
    /// # Errors
    ///
    /// - [`TypeError::InvalidName`] if the name is empty, longer than
    ///   [`MAX_PAIR_NAME_LEN`], or contains characters outside `[a-z1-5.]`
    /// - [`TypeError::InvalidBounds`] if `min_value > max_value`
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name.len() > MAX_PAIR_NAME_LEN {
            return Err(TypeError::InvalidName(self.name.clone()));
        }
        let valid = self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || ('1'..='5').contains(&c) || c == '.');
        if !valid {
            return Err(TypeError::InvalidName(self.name.clone()));
        }
        if self.min_value > self.max_value {
            return Err(TypeError::InvalidBounds {
                min: self.min_value,
                max: self.max_value,
            });
        }
        Ok(())
    }
}
