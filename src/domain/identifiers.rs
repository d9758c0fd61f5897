use crate::utils::error::{PushError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PushError::validation("empty token"));
        }
        Ok(Self(raw))
    }

    pub fn parse_list<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>> {
        if raw.is_empty() {
            return Err(PushError::validation("empty tokens list"));
        }

        // stops at the first bad entry
        raw.iter()
            .enumerate()
            .map(|(index, token)| {
                Self::new(token.as_ref()).map_err(|e| PushError::InvalidTokenError {
                    index,
                    message: match e {
                        PushError::ValidationError { message } => message,
                        other => other.to_string(),
                    },
                })
            })
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(PushError::validation("empty task id"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Short,
    Near,
    Relaxed,
    Scheduled,
}

impl TaskType {
    pub const ALL: [TaskType; 4] = [
        TaskType::Short,
        TaskType::Near,
        TaskType::Relaxed,
        TaskType::Scheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Short => "short",
            TaskType::Near => "near",
            TaskType::Relaxed => "relaxed",
            TaskType::Scheduled => "scheduled",
        }
    }

    /// Provider enum name, e.g. `TASK_TYPE_SHORT`.
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskType::Short => "TASK_TYPE_SHORT",
            TaskType::Near => "TASK_TYPE_NEAR",
            TaskType::Relaxed => "TASK_TYPE_RELAXED",
            TaskType::Scheduled => "TASK_TYPE_SCHEDULED",
        }
    }

    fn lookup(raw: &str) -> Option<Self> {
        // accepts "short" as well as "TASK_TYPE_SHORT"
        let normalized = raw.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("task_type_")
            .unwrap_or(normalized.as_str());
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl FromStr for TaskType {
    type Err = PushError;

    fn from_str(raw: &str) -> Result<Self> {
        Self::lookup(raw).ok_or_else(|| PushError::validation(format!("invalid task type: {}", raw)))
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template lookup key. Unlike [`TaskType::from_str`], an unrecognized raw
/// value selects the default template instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Known(TaskType),
    Unknown,
}

impl TemplateKey {
    pub fn from_raw(raw: &str) -> Self {
        TaskType::lookup(raw).map_or(TemplateKey::Unknown, TemplateKey::Known)
    }
}

impl From<TaskType> for TemplateKey {
    fn from(task_type: TaskType) -> Self {
        TemplateKey::Known(task_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejects_empty() {
        assert!(Token::new("").is_err());
        assert_eq!(Token::new("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_parse_list_reports_first_bad_index() {
        let err = Token::parse_list(&["a", "b", "", "d", ""]).unwrap_err();
        match err {
            PushError::InvalidTokenError { index, message } => {
                assert_eq!(index, 2);
                assert_eq!(message, "empty token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_list_rejects_empty_list() {
        let raw: Vec<String> = vec![];
        let err = Token::parse_list(&raw).unwrap_err();
        assert!(matches!(err, PushError::ValidationError { ref message } if message == "empty tokens list"));
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let tokens = Token::parse_list(&["t1", "t2", "t3"]).unwrap();
        let raw: Vec<&str> = tokens.iter().map(Token::as_str).collect();
        assert_eq!(raw, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn test_task_id_rejects_empty() {
        let err = TaskId::new("").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: empty task id");
        assert_eq!(TaskId::new("task-1").unwrap().to_string(), "task-1");
    }

    #[test]
    fn test_task_type_strict_parsing() {
        assert_eq!("short".parse::<TaskType>().unwrap(), TaskType::Short);
        assert_eq!("Near".parse::<TaskType>().unwrap(), TaskType::Near);
        assert_eq!(
            "TASK_TYPE_RELAXED".parse::<TaskType>().unwrap(),
            TaskType::Relaxed
        );
        assert_eq!(
            " scheduled ".parse::<TaskType>().unwrap(),
            TaskType::Scheduled
        );

        let err = "urgent".parse::<TaskType>().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: invalid task type: urgent");
        assert!("TASK_TYPE_UNSPECIFIED".parse::<TaskType>().is_err());
        assert!("".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_template_key_is_lenient() {
        assert_eq!(
            TemplateKey::from_raw("short"),
            TemplateKey::Known(TaskType::Short)
        );
        assert_eq!(TemplateKey::from_raw("urgent"), TemplateKey::Unknown);
        assert_eq!(TemplateKey::from_raw(""), TemplateKey::Unknown);
    }

    #[test]
    fn test_wire_names_round_trip_through_strict_parser() {
        for task_type in TaskType::ALL {
            assert_eq!(task_type.wire_name().parse::<TaskType>().unwrap(), task_type);
        }
    }
}
