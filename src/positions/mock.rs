use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{PositionSource, PositionSourceError};
use crate::models::Position;

/// In-process stand-in for on-chain pool reads.
#[derive(Debug, Clone)]
pub struct MockPositionSource {
    positions: Vec<Position>,
    fail_with: Option<String>,
}

impl MockPositionSource {
    /// The default lending-pool snapshot: USDC supply, XLM borrow against
    /// collateral, and a small TBRG governance-token supply.
    pub fn new() -> Self {
        Self::with_positions(default_positions())
    }

    pub fn with_positions(positions: Vec<Position>) -> Self {
        Self {
            positions,
            fail_with: None,
        }
    }

    /// A source whose every fetch fails with `Unexpected(reason)`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            positions: Vec::new(),
            fail_with: Some(reason.into()),
        }
    }
}

impl Default for MockPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionSource for MockPositionSource {
    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<Position>, PositionSourceError> {
        if let Some(reason) = &self.fail_with {
            return Err(PositionSourceError::Unexpected(reason.clone()));
        }
        tracing::debug!(wallet = %wallet, count = self.positions.len(), "Serving mock positions");
        Ok(self.positions.clone())
    }
}

fn default_positions() -> Vec<Position> {
    vec![
        Position {
            asset: "USDC".into(),
            symbol: "USDC".into(),
            supplied: Decimal::from(100_000),
            borrowed: Decimal::ZERO,
            collateral: false,
            apy: Decimal::new(45, 1),
            usd_value: Decimal::from(100_000),
        },
        Position {
            asset: "XLM".into(),
            symbol: "XLM".into(),
            supplied: Decimal::from(50_000),
            borrowed: Decimal::from(25_000),
            collateral: true,
            apy: Decimal::new(32, 1),
            usd_value: Decimal::from(6_000),
        },
        Position {
            asset: "TBRG".into(),
            symbol: "TBRG".into(),
            supplied: Decimal::from(10_000),
            borrowed: Decimal::ZERO,
            collateral: false,
            apy: Decimal::new(120, 1),
            usd_value: Decimal::from(2_500),
        },
    ]
}
