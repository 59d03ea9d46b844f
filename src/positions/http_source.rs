use async_trait::async_trait;
use reqwest::Client;

use super::{PositionSource, PositionSourceError};
use crate::models::Position;

/// Position reader backed by an HTTP pool indexer:
/// `GET {base_url}/positions/{wallet}` returning a JSON array of positions.
#[derive(Debug, Clone)]
pub struct HttpPositionSource {
    http: Client,
    base_url: String,
}

impl HttpPositionSource {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn positions_url(&self, wallet: &str) -> Result<String, PositionSourceError> {
        if !wallet.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PositionSourceError::InvalidWallet(wallet.to_string()));
        }
        Ok(format!("{}/positions/{}", self.base_url, wallet))
    }
}

#[async_trait]
impl PositionSource for HttpPositionSource {
    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<Position>, PositionSourceError> {
        let url = self.positions_url(wallet)?;
        let resp = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?;

        let positions: Vec<Position> = resp.json().await?;
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_url_trims_trailing_slash() {
        let source = HttpPositionSource::new(Client::new(), "http://indexer.local/api/");
        assert_eq!(
            source.positions_url("GABC123").unwrap(),
            "http://indexer.local/api/positions/GABC123"
        );
    }

    #[test]
    fn test_rejects_wallet_with_path_characters() {
        let source = HttpPositionSource::new(Client::new(), "http://indexer.local");
        let err = source.positions_url("../admin").unwrap_err();
        assert!(matches!(err, PositionSourceError::InvalidWallet(_)));
    }

    #[tokio::test]
    async fn test_invalid_wallet_fails_before_request() {
        let source = HttpPositionSource::new(Client::new(), "http://127.0.0.1:1");
        let err = source.fetch_positions("bad/wallet").await.unwrap_err();
        assert!(matches!(err, PositionSourceError::InvalidWallet(_)));
    }
}
