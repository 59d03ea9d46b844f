use metrics::counter;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::aggregator::{calculate_dashboard_metrics_with_haircut, DashboardMetrics};
use crate::models::Position;
use crate::positions::{PositionSource, PositionSourceError};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Failed to fetch user positions")]
    FetchFailed(#[source] PositionSourceError),
}

/// Dashboard totals together with the snapshot they were computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(flatten)]
    pub metrics: DashboardMetrics,
    pub positions: Vec<Position>,
}

/// Fetch a wallet's positions and aggregate them.
///
/// An empty wallet yields zeroed metrics without touching the source. Source
/// failures are logged here and surfaced as `FetchFailed`; nothing is retried.
pub async fn fetch_dashboard_data(
    source: &dyn PositionSource,
    wallet: &str,
    haircut: Decimal,
) -> Result<DashboardData, DashboardError> {
    let wallet = wallet.trim();
    if wallet.is_empty() {
        return Ok(DashboardData::default());
    }

    let positions = source.fetch_positions(wallet).await.map_err(|e| {
        tracing::error!(error = %e, wallet = %wallet, "Error fetching user positions");
        counter!("position_fetch_failures_total").increment(1);
        DashboardError::FetchFailed(e)
    })?;

    let metrics = calculate_dashboard_metrics_with_haircut(&positions, haircut);

    tracing::debug!(
        wallet = %wallet,
        positions = positions.len(),
        active_loans = metrics.active_loans,
        "Dashboard data assembled"
    );

    Ok(DashboardData { metrics, positions })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::dashboard::DEFAULT_BORROW_HAIRCUT;
    use crate::positions::MockPositionSource;

    /// Counts calls so the empty-wallet short-circuit can be observed.
    struct CountingSource {
        calls: AtomicUsize,
        inner: MockPositionSource,
    }

    #[async_trait]
    impl PositionSource for CountingSource {
        async fn fetch_positions(&self, wallet: &str) -> Result<Vec<Position>, PositionSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_positions(wallet).await
        }
    }

    fn counting(inner: MockPositionSource) -> CountingSource {
        CountingSource {
            calls: AtomicUsize::new(0),
            inner,
        }
    }

    fn spec_positions() -> Vec<Position> {
        vec![
            Position {
                asset: "USDC_CONTRACT".into(),
                symbol: "USDC".into(),
                supplied: Decimal::from(100_000),
                borrowed: Decimal::ZERO,
                collateral: false,
                apy: Decimal::new(45, 1),
                usd_value: Decimal::from(100_000),
            },
            Position {
                asset: "XLM_CONTRACT".into(),
                symbol: "XLM".into(),
                supplied: Decimal::from(50_000),
                borrowed: Decimal::from(25_000),
                collateral: true,
                apy: Decimal::new(32, 1),
                usd_value: Decimal::from(6_000),
            },
        ]
    }

    #[tokio::test]
    async fn test_empty_wallet_skips_source() {
        let source = counting(MockPositionSource::new());

        let data = fetch_dashboard_data(&source, "", DEFAULT_BORROW_HAIRCUT)
            .await
            .unwrap();
        assert_eq!(data, DashboardData::default());

        let data = fetch_dashboard_data(&source, "   ", DEFAULT_BORROW_HAIRCUT)
            .await
            .unwrap();
        assert!(data.positions.is_empty());

        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_assembles_metrics_and_positions() {
        let source = counting(MockPositionSource::with_positions(spec_positions()));

        let data = fetch_dashboard_data(&source, "GWALLET", DEFAULT_BORROW_HAIRCUT)
            .await
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(data.positions, spec_positions());
        assert_eq!(data.metrics.total_supplied, Decimal::from(150_000));
        assert_eq!(data.metrics.total_borrowed, Decimal::from(25_000));
        assert_eq!(data.metrics.active_loans, 1);
        assert_eq!(data.metrics.available_balance, Decimal::from(130_000));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_propagated() {
        let source = MockPositionSource::failing("rpc down");

        let err = fetch_dashboard_data(&source, "GWALLET", DEFAULT_BORROW_HAIRCUT)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch user positions");
        let cause = err.source().expect("cause should be attached");
        assert!(cause.to_string().contains("rpc down"));
    }

    #[tokio::test]
    async fn test_serialized_shape_is_flat() {
        let source = MockPositionSource::with_positions(spec_positions());
        let data = fetch_dashboard_data(&source, "GWALLET", DEFAULT_BORROW_HAIRCUT)
            .await
            .unwrap();

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["totalSupplied"].as_f64(), Some(150_000.0));
        assert_eq!(json["totalBorrowed"].as_f64(), Some(25_000.0));
        assert_eq!(json["availableBalance"].as_f64(), Some(130_000.0));
        assert_eq!(json["activeLoans"], 1);
        assert_eq!(json["positions"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["positions"][1]["usdValue"].as_f64(), Some(6_000.0));
    }
}
