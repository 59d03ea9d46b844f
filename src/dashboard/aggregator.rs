use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Position;

/// Share of outstanding borrows held back from the available balance (0.8).
pub const DEFAULT_BORROW_HAIRCUT: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Portfolio-level totals derived from a position snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_supplied: Decimal,
    pub total_borrowed: Decimal,
    pub available_balance: Decimal,
    pub active_loans: u32,
}

/// Aggregate positions using the default 0.8 borrow haircut.
pub fn calculate_dashboard_metrics(positions: &[Position]) -> DashboardMetrics {
    calculate_dashboard_metrics_with_haircut(positions, DEFAULT_BORROW_HAIRCUT)
}

/// Aggregate positions into dashboard totals.
///
/// Supplied and borrowed amounts are summed in their native units across
/// assets; `usd_value` is not consulted. Totals saturate at `Decimal::MAX`
/// rather than overflowing. The available balance is clamped at zero.
pub fn calculate_dashboard_metrics_with_haircut(
    positions: &[Position],
    haircut: Decimal,
) -> DashboardMetrics {
    let total_supplied = positions
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.supplied));
    let total_borrowed = positions
        .iter()
        .fold(Decimal::ZERO, |acc, p| acc.saturating_add(p.borrowed));
    let active_loans = positions.iter().filter(|p| p.has_active_loan()).count() as u32;

    let available_balance = total_supplied
        .saturating_sub(total_borrowed.saturating_mul(haircut))
        .max(Decimal::ZERO);

    DashboardMetrics {
        total_supplied,
        total_borrowed,
        available_balance,
        active_loans,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
