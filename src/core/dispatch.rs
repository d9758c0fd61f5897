use crate::core::aggregate::BulkResultBuilder;
use crate::core::batch::{batch_count, split_batches, MAX_BATCH_SIZE};
use crate::core::icon::icon_url;
use crate::core::templates::{RandomBodySelector, TemplateProvider};
use crate::core::{
    BodySelector, BulkResult, MessagingGateway, MulticastMessage, Notification,
    NotificationRequest, TokenOutcome,
};
use crate::domain::identifiers::{TaskId, TaskType, Token};
use crate::utils::error::{PushError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub max_batch_size: usize,
    /// Return what was delivered before a failing batch instead of dropping it.
    pub partial_results: bool,
    pub web_app_base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_batch_size: MAX_BATCH_SIZE,
            partial_results: false,
            web_app_base_url: None,
            timeout: None,
        }
    }
}

/// Sends one notification to many devices, batch by batch.
pub struct Dispatcher<G: MessagingGateway, R: BodySelector = RandomBodySelector> {
    gateway: Arc<G>,
    templates: TemplateProvider<R>,
    options: DispatchOptions,
}

impl<G: MessagingGateway, R: BodySelector> Dispatcher<G, R> {
    pub fn new(gateway: Arc<G>, templates: TemplateProvider<R>, options: DispatchOptions) -> Self {
        Self {
            gateway,
            templates,
            options,
        }
    }

    /// Validates the raw request and sends it. Validation failures return
    /// before the gateway is touched.
    pub async fn dispatch(
        &self,
        request: NotificationRequest,
        cancel: &CancellationToken,
    ) -> Result<BulkResult> {
        let params = request.into_params()?;

        tracing::info!(
            task_id = %params.task_id,
            task_type = %params.task_type,
            token_count = params.tokens.len(),
            "📨 Sending notification"
        );

        let result = self
            .send_bulk(
                &params.tokens,
                &params.task_id,
                params.task_type,
                params.color.as_deref(),
                cancel,
            )
            .await?;

        tracing::info!(
            total = result.total,
            success_count = result.success_count,
            failure_count = result.failure_count,
            "✅ Notification sent"
        );
        Ok(result)
    }

    pub async fn send_bulk(
        &self,
        tokens: &[Token],
        task_id: &TaskId,
        task_type: TaskType,
        color: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<BulkResult> {
        if tokens.is_empty() {
            return Err(PushError::validation("empty tokens list"));
        }

        // one title/body and icon for the whole request
        let deadline = self.options.timeout.map(|t| Instant::now() + t);
        let notification = self.build_notification(task_type, color);
        let data = HashMap::from([
            ("task_id".to_string(), task_id.to_string()),
            ("task_type".to_string(), task_type.to_string()),
        ]);

        let batches = split_batches(tokens, self.options.max_batch_size);
        if batches.len() > 1 {
            tracing::debug!(
                total_tokens = tokens.len(),
                max_per_batch = self.options.max_batch_size,
                batches = batch_count(tokens.len(), self.options.max_batch_size),
                "📦 Splitting tokens into batches"
            );
        }

        let mut builder = BulkResultBuilder::with_capacity(tokens.len());

        // batches go out strictly one after another
        for (index, batch) in batches.into_iter().enumerate() {
            let batch_number = index + 1;
            tracing::debug!(batch_number, batch_size = batch.len(), "Sending batch");

            let message = MulticastMessage {
                tokens: batch,
                notification: &notification,
                data: &data,
            };

            let outcomes = match self.send_batch(&message, cancel, deadline).await {
                Ok(outcomes) => outcomes,
                Err(e) => {
                    tracing::error!(batch_number, error = %e, "❌ Batch send failed");
                    return Err(self.abort(builder, e));
                }
            };

            builder.extend(outcomes);
            tracing::debug!(
                batch_number,
                success_count = builder.success_count(),
                failure_count = builder.failure_count(),
                "Batch completed"
            );
        }

        Ok(builder.finish())
    }

    fn build_notification(&self, task_type: TaskType, color: Option<&str>) -> Notification {
        let message = self.templates.random_message(task_type);
        let icon = match (self.options.web_app_base_url.as_deref(), color) {
            (Some(base), Some(color)) => icon_url(base, task_type, color),
            _ => None,
        };
        if let Some(icon) = &icon {
            tracing::debug!(icon_url = %icon, "Notification icon URL set");
        }

        Notification {
            title: message.title,
            body: message.body,
            icon,
        }
    }

    async fn send_batch(
        &self,
        message: &MulticastMessage<'_>,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> Result<Vec<TokenOutcome>> {
        if cancel.is_cancelled() {
            return Err(PushError::Cancelled);
        }

        // cancellation wins over a response that is ready at the same time
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PushError::Cancelled),
            _ = wait_until(deadline) => {
                tracing::warn!("⏰ Dispatch deadline exceeded");
                return Err(PushError::Cancelled);
            }
            response = self.gateway.send_multicast(message) => response?,
        };

        // outcomes are matched to tokens by position
        if response.responses.len() != message.tokens.len() {
            return Err(PushError::gateway(format!(
                "gateway returned {} responses for {} tokens",
                response.responses.len(),
                message.tokens.len()
            )));
        }

        let outcomes: Vec<TokenOutcome> = message
            .tokens
            .iter()
            .zip(response.responses)
            .enumerate()
            .map(|(index, (token, resp))| {
                let outcome = TokenOutcome::from_response(token, resp);
                if let Some(error) = &outcome.error_detail {
                    tracing::warn!(token_index = index, error = %error, "Send failed for token");
                }
                outcome
            })
            .collect();

        // per-token flags are the source of truth for the counts
        let delivered = outcomes.iter().filter(|o| o.success).count();
        if delivered != response.success_count
            || outcomes.len() - delivered != response.failure_count
        {
            tracing::warn!(
                reported_success = response.success_count,
                reported_failure = response.failure_count,
                counted_success = delivered,
                "Gateway counts disagree with per-token results, using per-token results"
            );
        }

        Ok(outcomes)
    }

    fn abort(&self, builder: BulkResultBuilder, error: PushError) -> PushError {
        // nothing delivered yet means there is nothing partial to report
        if self.options.partial_results && builder.total() > 0 {
            PushError::PartialDelivery {
                completed: builder.finish(),
                source: Box::new(error),
            }
        } else {
            error
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
