pub mod notification;
pub mod position;

pub use notification::{Notification, NotificationKind};
pub use position::Position;
