use rust_decimal::Decimal;
use std::env;
use std::time::Duration;

use crate::dashboard::DEFAULT_BORROW_HAIRCUT;
use crate::notifications::RelayConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    /// Bearer token required on `/api/*` and `/ws`; auth disabled when unset.
    pub api_token: Option<String>,

    // Positions
    pub position_source_url: Option<String>,
    pub borrow_haircut: Decimal,

    // Notification relay
    pub notification_ws_urls: Vec<String>,
    pub notification_poll_url: Option<String>,
    pub notification_poll_secs: u64,
    pub notify_rate_limit: usize,
    pub notify_rate_window_secs: u64,
    pub notification_buffer: usize,

    // Dashboard refresher
    pub watched_wallets: Vec<String>,
    pub dashboard_refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            api_token: None,
            position_source_url: None,
            borrow_haircut: DEFAULT_BORROW_HAIRCUT,
            notification_ws_urls: Vec::new(),
            notification_poll_url: None,
            notification_poll_secs: 15,
            notify_rate_limit: 20,
            notify_rate_window_secs: 60,
            notification_buffer: 100,
            watched_wallets: Vec::new(),
            dashboard_refresh_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let borrow_haircut = match non_empty("BORROW_HAIRCUT") {
            Some(raw) => raw
                .parse::<Decimal>()
                .map_err(|e| anyhow::anyhow!("BORROW_HAIRCUT is not a number: {e}"))?,
            None => defaults.borrow_haircut,
        };
        check_haircut(borrow_haircut)?;

        let notify_rate_limit = parse_or("NOTIFY_RATE_LIMIT", defaults.notify_rate_limit)?;
        check_rate_limit(notify_rate_limit)?;

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", defaults.port)?,
            api_token: non_empty("API_TOKEN"),

            position_source_url: non_empty("POSITION_SOURCE_URL"),
            borrow_haircut,

            notification_ws_urls: split_list(&env::var("NOTIFICATION_WS_URLS").unwrap_or_default()),
            notification_poll_url: non_empty("NOTIFICATION_POLL_URL"),
            notification_poll_secs: parse_or("NOTIFICATION_POLL_SECS", defaults.notification_poll_secs)?
                .max(1),
            notify_rate_limit,
            notify_rate_window_secs: parse_or(
                "NOTIFY_RATE_WINDOW_SECS",
                defaults.notify_rate_window_secs,
            )?,
            notification_buffer: parse_or("NOTIFICATION_BUFFER", defaults.notification_buffer)?
                .max(1),

            watched_wallets: split_list(&env::var("WATCHED_WALLETS").unwrap_or_default()),
            dashboard_refresh_secs: parse_or("DASHBOARD_REFRESH_SECS", defaults.dashboard_refresh_secs)?
                .max(1),
        })
    }

    /// Relay settings, or `None` when no upstream feed is configured.
    pub fn relay_config(&self) -> Option<RelayConfig> {
        if self.notification_ws_urls.is_empty() && self.notification_poll_url.is_none() {
            return None;
        }
        Some(RelayConfig {
            ws_urls: self.notification_ws_urls.clone(),
            poll_url: self.notification_poll_url.clone(),
            poll_interval: Duration::from_secs(self.notification_poll_secs),
        })
    }

    pub fn notify_rate_window(&self) -> Duration {
        Duration::from_secs(self.notify_rate_window_secs)
    }
}

fn check_haircut(haircut: Decimal) -> anyhow::Result<()> {
    if haircut < Decimal::ZERO || haircut > Decimal::ONE {
        anyhow::bail!("BORROW_HAIRCUT must be within [0, 1], got {haircut}");
    }
    Ok(())
}

fn check_rate_limit(limit: usize) -> anyhow::Result<()> {
    if limit == 0 {
        anyhow::bail!("NOTIFY_RATE_LIMIT must be greater than zero");
    }
    Ok(())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is invalid ({raw}): {e}")),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
