use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One user's supply/borrow stake in a single lending-pool asset.
///
/// Snapshots are produced fresh by a `PositionSource` on every fetch and are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub asset: String,
    pub symbol: String,
    pub supplied: Decimal,
    pub borrowed: Decimal,
    pub collateral: bool,
    pub apy: Decimal,
    pub usd_value: Decimal,
}

impl Position {
    /// True when the user currently owes anything in this asset.
    pub fn has_active_loan(&self) -> bool {
        self.borrowed > Decimal::ZERO
    }
}
