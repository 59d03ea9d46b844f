pub mod http_source;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Position;

pub use http_source::HttpPositionSource;
pub use mock::MockPositionSource;

#[derive(Debug, Error)]
pub enum PositionSourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Reader of a wallet's current per-asset supply/borrow positions.
///
/// Each call returns a fresh snapshot as of call time.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<Position>, PositionSourceError>;
}
