pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod notifications;
pub mod positions;
pub mod ws;
