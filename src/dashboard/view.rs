use serde::Serialize;

use super::aggregator::DashboardMetrics;
use super::assembler::DashboardData;
use super::format::{calculate_percentage_change, format_currency, format_percent, PercentageChange};

/// Display strings for one position row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRow {
    pub symbol: String,
    pub supplied: String,
    pub borrowed: String,
    pub usd_value: String,
    pub apy: String,
    pub collateral: bool,
}

/// Change of each headline figure against a previous snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChanges {
    pub total_supplied: PercentageChange,
    pub total_borrowed: PercentageChange,
    pub available_balance: PercentageChange,
}

/// Dashboard view-model with every figure pre-formatted for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub total_supplied: String,
    pub total_borrowed: String,
    pub available_balance: String,
    pub active_loans: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<MetricChanges>,
    pub positions: Vec<PositionRow>,
}

impl DashboardView {
    pub fn from_data(data: &DashboardData, previous: Option<&DashboardMetrics>) -> Self {
        let m = &data.metrics;

        let changes = previous.map(|prev| MetricChanges {
            total_supplied: calculate_percentage_change(m.total_supplied, prev.total_supplied),
            total_borrowed: calculate_percentage_change(m.total_borrowed, prev.total_borrowed),
            available_balance: calculate_percentage_change(
                m.available_balance,
                prev.available_balance,
            ),
        });

        let positions = data
            .positions
            .iter()
            .map(|p| PositionRow {
                symbol: p.symbol.clone(),
                supplied: format_currency(p.supplied),
                borrowed: format_currency(p.borrowed),
                usd_value: format_currency(p.usd_value),
                apy: format_percent(p.apy),
                collateral: p.collateral,
            })
            .collect();

        Self {
            total_supplied: format_currency(m.total_supplied),
            total_borrowed: format_currency(m.total_borrowed),
            available_balance: format_currency(m.available_balance),
            active_loans: m.active_loans,
            changes,
            positions,
        }
    }
}
