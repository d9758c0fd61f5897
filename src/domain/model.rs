use crate::domain::identifiers::{TaskId, TaskType, Token};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub tokens: Vec<String>,
    pub task_id: String,
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotificationParams {
    pub tokens: Vec<Token>,
    pub task_id: TaskId,
    pub task_type: TaskType,
    pub color: Option<String>,
}

impl NotificationRequest {
    pub fn into_params(self) -> Result<NotificationParams> {
        // tokens first, then task id, then task type
        let tokens = Token::parse_list(&self.tokens)?;
        let task_id = TaskId::new(self.task_id)?;
        let task_type = self.task_type.parse::<TaskType>()?;
        // blank color means no icon
        let color = self.color.filter(|c| !c.trim().is_empty());

        Ok(NotificationParams {
            tokens,
            task_id,
            task_type,
            color,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MulticastMessage<'a> {
    pub tokens: &'a [Token],
    pub notification: &'a Notification,
    pub data: &'a HashMap<String, String>,
}

/// Per-token entry of a gateway response, aligned with the request tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendResponse {
    pub fn delivered(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticastResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub responses: Vec<SendResponse>,
}

impl MulticastResponse {
    pub fn from_responses(responses: Vec<SendResponse>) -> Self {
        let success_count = responses.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: responses.len() - success_count,
            responses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOutcome {
    pub token: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl TokenOutcome {
    pub fn from_response(token: &Token, response: SendResponse) -> Self {
        // message id only on success, error detail only on failure
        if response.success {
            Self {
                token: token.to_string(),
                success: true,
                message_id: response.message_id,
                error_detail: None,
            }
        } else {
            Self {
                token: token.to_string(),
                success: false,
                message_id: None,
                error_detail: Some(
                    response
                        .error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| "unknown error".to_string()),
                ),
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub outcomes: Vec<TokenOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub success: bool,
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<TokenOutcome>,
}

impl From<BulkResult> for NotificationResponse {
    fn from(result: BulkResult) -> Self {
        Self {
            success: true,
            total: result.total,
            success_count: result.success_count,
            failure_count: result.failure_count,
            results: result.outcomes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PushError;

    fn request() -> NotificationRequest {
        NotificationRequest {
            tokens: vec!["t1".to_string(), "t2".to_string()],
            task_id: "task-42".to_string(),
            task_type: "near".to_string(),
            color: Some("#FF8800".to_string()),
        }
    }

    #[test]
    fn test_into_params_accepts_valid_request() {
        let params = request().into_params().unwrap();
        assert_eq!(params.tokens.len(), 2);
        assert_eq!(params.task_id.as_str(), "task-42");
        assert_eq!(params.task_type, TaskType::Near);
        assert_eq!(params.color.as_deref(), Some("#FF8800"));
    }

    #[test]
    fn test_into_params_checks_tokens_first() {
        let mut req = request();
        req.tokens.clear();
        req.task_id.clear();
        let err = req.into_params().unwrap_err();
        assert!(err.to_string().contains("empty tokens list"));
    }

    #[test]
    fn test_into_params_rejects_unknown_type() {
        let mut req = request();
        req.task_type = "someday".to_string();
        let err = req.into_params().unwrap_err();
        assert!(matches!(err, PushError::ValidationError { .. }));
    }

    #[test]
    fn test_blank_color_is_treated_as_absent() {
        let mut req = request();
        req.color = Some("  ".to_string());
        assert!(req.into_params().unwrap().color.is_none());
    }

    #[test]
    fn test_outcome_drops_fields_that_do_not_match_status() {
        let token = Token::new("t1").unwrap();
        let ok = TokenOutcome::from_response(
            &token,
            SendResponse {
                success: true,
                message_id: Some("m-1".to_string()),
                error: Some("ignored".to_string()),
            },
        );
        assert_eq!(ok.message_id.as_deref(), Some("m-1"));
        assert!(ok.error_detail.is_none());

        let failed = TokenOutcome::from_response(
            &token,
            SendResponse {
                success: false,
                message_id: Some("m-2".to_string()),
                error: None,
            },
        );
        assert!(failed.message_id.is_none());
        assert_eq!(failed.error_detail.as_deref(), Some("unknown error"));
    }

    #[test]
    fn test_request_deserializes_without_color() {
        let req: NotificationRequest = serde_json::from_str(
            r#"{"tokens":["a"],"task_id":"t","task_type":"short"}"#,
        )
        .unwrap();
        assert!(req.color.is_none());
    }
}
