pub mod aggregate;
pub mod batch;
pub mod dispatch;
pub mod icon;
pub mod templates;

pub use crate::domain::model::{
    BulkResult, Message, MulticastMessage, MulticastResponse, Notification, NotificationRequest,
    SendResponse, TokenOutcome,
};
pub use crate::domain::ports::{BodySelector, GatewaySettings, MessagingGateway};
pub use crate::utils::error::Result;
