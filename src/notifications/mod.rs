pub mod hub;
pub mod rate_limiter;
pub mod relay;

pub use hub::{NotificationError, NotificationHub};
pub use rate_limiter::SlidingWindowLimiter;
pub use relay::{run_relay_client, RelayConfig};
