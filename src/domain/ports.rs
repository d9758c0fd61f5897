use crate::domain::model::{MulticastMessage, MulticastResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One entry in [`MulticastResponse::responses`] per token, in token order.
/// `Err` is for a failed call, not for tokens that could not be delivered.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_multicast(&self, message: &MulticastMessage<'_>) -> Result<MulticastResponse>;
}

pub trait BodySelector: Send + Sync {
    // index in 0..len, len is never zero
    fn pick(&self, len: usize) -> usize;
}

pub trait GatewaySettings: Send + Sync {
    fn endpoint(&self) -> &str;
    fn project_id(&self) -> &str;
    /// Fixed bearer token. Overrides the credentials file when set.
    fn access_token(&self) -> Option<&str>;
    fn service_account_path(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn concurrency(&self) -> usize;
}
