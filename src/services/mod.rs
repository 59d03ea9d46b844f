pub mod dashboard_refresher;
