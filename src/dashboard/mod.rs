pub mod aggregator;
pub mod assembler;
pub mod format;
pub mod view;

pub use aggregator::{
    calculate_dashboard_metrics, calculate_dashboard_metrics_with_haircut, DashboardMetrics,
    DEFAULT_BORROW_HAIRCUT,
};
pub use assembler::{fetch_dashboard_data, DashboardData, DashboardError};
pub use format::{
    calculate_percentage_change, format_currency, format_percent, ChangeType, PercentageChange,
};
pub use view::DashboardView;
