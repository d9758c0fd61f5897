use crate::core::{MessagingGateway, MulticastMessage, MulticastResponse, SendResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// Gateway that only logs. Every token is reported as delivered.
#[derive(Debug, Default)]
pub struct DryRunGateway {
    sent: AtomicU64,
}

impl DryRunGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessagingGateway for DryRunGateway {
    async fn send_multicast(&self, message: &MulticastMessage<'_>) -> Result<MulticastResponse> {
        let task_id = message.data.get("task_id").map(String::as_str).unwrap_or("-");

        tracing::info!(
            token_count = message.tokens.len(),
            title = %message.notification.title,
            body = %message.notification.body,
            icon = message.notification.icon.as_deref().unwrap_or("-"),
            "🧪 Dry run: notification not sent"
        );

        let responses = message
            .tokens
            .iter()
            .map(|_| {
                let n = self.sent.fetch_add(1, Ordering::Relaxed) + 1;
                SendResponse::delivered(format!("dry-run/{}/{}", task_id, n))
            })
            .collect();

        Ok(MulticastResponse::from_responses(responses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Notification;
    use crate::domain::identifiers::Token;
    use std::collections::HashMap;

    #[test]
    fn test_dry_run_reports_every_token_delivered() {
        let gateway = DryRunGateway::new();
        let tokens = vec![Token::new("a").unwrap(), Token::new("b").unwrap()];
        let notification = Notification {
            title: "t".to_string(),
            body: "b".to_string(),
            icon: None,
        };
        let data = HashMap::from([("task_id".to_string(), "task-9".to_string())]);

        let message = MulticastMessage {
            tokens: &tokens,
            notification: &notification,
            data: &data,
        };
        let response = tokio_test::block_on(gateway.send_multicast(&message)).unwrap();

        assert_eq!(response.success_count, 2);
        assert_eq!(response.failure_count, 0);
        assert_eq!(response.responses[1].message_id.as_deref(), Some("dry-run/task-9/2"));
        assert_eq!(gateway.sent(), 2);
    }
}
