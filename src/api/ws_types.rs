use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardView;
use crate::models::Notification;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "notification")]
    Notification(Notification),

    #[serde(rename = "dashboard_update")]
    DashboardUpdate(DashboardUpdate),
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardUpdate {
    pub wallet: String,
    pub view: DashboardView,
}

/// Text frames a client may send to narrow what it receives.
///
/// `{"type":"subscribe","wallet":"G...","userId":"u-1"}` or `{"type":"unsubscribe"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    Subscribe {
        #[serde(default)]
        wallet: Option<String>,
        #[serde(default, rename = "userId")]
        user_id: Option<String>,
    },
    Unsubscribe,
}

/// Per-connection delivery filter.
///
/// Notifications addressed to a user only reach a client subscribed as that
/// user; broadcast notifications reach everyone. Dashboard updates are limited
/// to the subscribed wallet once one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub wallet: Option<String>,
    pub user_id: Option<String>,
}

impl ClientFilter {
    pub fn apply(&mut self, cmd: ClientCommand) {
        match cmd {
            ClientCommand::Subscribe { wallet, user_id } => {
                self.wallet = wallet;
                self.user_id = user_id;
            }
            ClientCommand::Unsubscribe => *self = Self::default(),
        }
    }

    pub fn allows(&self, msg: &WsMessage) -> bool {
        match msg {
            WsMessage::Notification(n) => match &n.user_id {
                None => true,
                Some(target) => self.user_id.as_deref() == Some(target.as_str()),
            },
            WsMessage::DashboardUpdate(update) => match &self.wallet {
                None => true,
                Some(wallet) => &update.wallet == wallet,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{DashboardData, DashboardView};
    use crate::models::NotificationKind;

    fn update_for(wallet: &str) -> WsMessage {
        WsMessage::DashboardUpdate(DashboardUpdate {
            wallet: wallet.into(),
            view: DashboardView::from_data(&DashboardData::default(), None),
        })
    }

    #[test]
    fn test_parse_client_commands() {
        let cmd: ClientCommand =
            serde_json::from_str(r#"{"type":"subscribe","wallet":"GABC","userId":"u-1"}"#).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Subscribe {
                wallet: Some("GABC".into()),
                user_id: Some("u-1".into()),
            }
        );

        let cmd: ClientCommand = serde_json::from_str(r#"{"type":"unsubscribe"}"#).unwrap();
        assert_eq!(cmd, ClientCommand::Unsubscribe);
    }

    #[test]
    fn test_targeted_notification_needs_matching_user() {
        let broadcast = WsMessage::Notification(Notification::new("a", "b", NotificationKind::Info));
        let targeted = WsMessage::Notification(
            Notification::new("Loan funded", "b", NotificationKind::Success).for_user("u-1"),
        );

        let mut filter = ClientFilter::default();
        assert!(filter.allows(&broadcast));
        assert!(!filter.allows(&targeted));

        filter.apply(ClientCommand::Subscribe {
            wallet: None,
            user_id: Some("u-1".into()),
        });
        assert!(filter.allows(&targeted));

        filter.apply(ClientCommand::Subscribe {
            wallet: None,
            user_id: Some("u-2".into()),
        });
        assert!(!filter.allows(&targeted));
    }

    #[test]
    fn test_dashboard_updates_follow_wallet_subscription() {
        let mut filter = ClientFilter::default();
        assert!(filter.allows(&update_for("GAAA")));

        filter.apply(ClientCommand::Subscribe {
            wallet: Some("GBBB".into()),
            user_id: None,
        });
        assert!(!filter.allows(&update_for("GAAA")));
        assert!(filter.allows(&update_for("GBBB")));

        filter.apply(ClientCommand::Unsubscribe);
        assert_eq!(filter, ClientFilter::default());
        assert!(filter.allows(&update_for("GAAA")));
    }
}
