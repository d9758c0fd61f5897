use crate::config::settings::Settings;
use crate::config::CliConfig;
use crate::core::NotificationRequest;
use crate::utils::error::Result;
use std::io::Read;

impl CliConfig {
    pub fn notification_request(&self) -> Result<NotificationRequest> {
        // a request file takes precedence over the individual flags
        if let Some(path) = &self.request {
            let content = if path == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(path)?
            };
            let mut request: NotificationRequest = serde_json::from_str(&content)?;
            if self.color.is_some() {
                request.color = self.color.clone();
            }
            return Ok(request);
        }

        // missing fields stay empty so request validation reports them
        Ok(NotificationRequest {
            tokens: self.tokens.clone(),
            task_id: self.task_id.clone().unwrap_or_default(),
            task_type: self.task_type.clone().unwrap_or_default(),
            color: self.color.clone(),
        })
    }

    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📋 Loading configuration from: {}", path);
                Settings::from_file(path)?.merge_env()?
            }
            None => Settings::from_env()?,
        };

        // command line wins over file and environment
        if let Some(messages) = &self.messages {
            settings.templates.path = Some(messages.clone());
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_request_from_flags() {
        let cli = CliConfig::parse_from([
            "push-invoker",
            "--tokens",
            "a,b,c",
            "--task-id",
            "task-1",
            "--task-type",
            "short",
            "--color",
            "#123456",
        ]);
        let request = cli.notification_request().unwrap();
        assert_eq!(request.tokens, vec!["a", "b", "c"]);
        assert_eq!(request.task_id, "task-1");
        assert_eq!(request.color.as_deref(), Some("#123456"));
    }

    #[test]
    fn test_missing_flags_surface_as_validation_errors() {
        let cli = CliConfig::parse_from(["push-invoker", "--tokens", "a"]);
        let request = cli.notification_request().unwrap();
        assert!(request.into_params().is_err());
    }

    #[test]
    fn test_request_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"tokens":["x"],"task_id":"t-7","task_type":"TASK_TYPE_NEAR"}"#)
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from(["push-invoker", "--request", path.as_str()]);
        let request = cli.notification_request().unwrap();
        assert_eq!(request.task_id, "t-7");
        assert!(request.into_params().is_ok());
    }

    #[test]
    fn test_messages_flag_overrides_settings() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[templates]\npath = \"from-file.toml\"\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "push-invoker",
            "--config",
            path.as_str(),
            "--messages",
            "override.toml",
        ]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.templates.path.as_deref(), Some("override.toml"));
    }
}
