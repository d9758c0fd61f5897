use crate::core::dispatch::DispatchOptions;
use crate::core::GatewaySettings;
use crate::utils::error::{PushError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub endpoint: Option<String>,
    #[serde(default)]
    pub project_id: String,
    pub access_token: Option<String>,
    pub service_account_path: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub web_app_base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Messages file; the embedded catalog is used when unset.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub partial_results: Option<bool>,
    pub timeout_seconds: Option<u64>,
}

impl Settings {
    /// Loads settings from a TOML file, substituting `${VAR}` references.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| PushError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        use once_cell::sync::Lazy;
        use regex::Regex;

        static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
        });

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Settings taken only from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gateway: GatewayConfig {
                endpoint: non_empty_env("FCM_ENDPOINT"),
                project_id: env::var("FIREBASE_PROJECT_ID").unwrap_or_default(),
                access_token: non_empty_env("FCM_ACCESS_TOKEN"),
                service_account_path: non_empty_env("GOOGLE_APPLICATION_CREDENTIALS"),
                timeout_seconds: parse_env("FCM_TIMEOUT_SECONDS")?,
                concurrency: parse_env("FCM_CONCURRENCY")?,
            },
            notification: NotificationConfig {
                web_app_base_url: non_empty_env("WEB_APP_BASE_URL"),
            },
            templates: TemplatesConfig {
                path: non_empty_env("MESSAGES_PATH"),
            },
            dispatch: DispatchConfig {
                partial_results: parse_env("DISPATCH_PARTIAL_RESULTS")?,
                timeout_seconds: parse_env("DISPATCH_TIMEOUT_SECONDS")?,
            },
        })
    }

    /// Fills values missing from the file with ones from the environment.
    pub fn merge_env(mut self) -> Result<Self> {
        let from_env = Self::from_env()?;
        self.gateway.endpoint = self.gateway.endpoint.or(from_env.gateway.endpoint);
        if self.gateway.project_id.is_empty() {
            self.gateway.project_id = from_env.gateway.project_id;
        }
        self.gateway.access_token = self.gateway.access_token.or(from_env.gateway.access_token);
        self.gateway.service_account_path = self
            .gateway
            .service_account_path
            .or(from_env.gateway.service_account_path);
        self.gateway.timeout_seconds = self.gateway.timeout_seconds.or(from_env.gateway.timeout_seconds);
        self.gateway.concurrency = self.gateway.concurrency.or(from_env.gateway.concurrency);
        self.notification.web_app_base_url = self
            .notification
            .web_app_base_url
            .or(from_env.notification.web_app_base_url);
        self.templates.path = self.templates.path.or(from_env.templates.path);
        self.dispatch.partial_results = self.dispatch.partial_results.or(from_env.dispatch.partial_results);
        self.dispatch.timeout_seconds = self.dispatch.timeout_seconds.or(from_env.dispatch.timeout_seconds);
        Ok(self)
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            partial_results: self.dispatch.partial_results.unwrap_or(false),
            web_app_base_url: self.notification.web_app_base_url.clone(),
            timeout: self.dispatch.timeout_seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }

    /// Checks only what a dry run needs.
    pub fn validate_offline(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(base) = &self.notification.web_app_base_url {
            validate_url("notification.web_app_base_url", base)?;
        }
        if let Some(path) = &self.templates.path {
            validate_path("templates.path", path)?;
        }
        if let Some(timeout) = self.dispatch.timeout_seconds {
            validate_range("dispatch.timeout_seconds", timeout, 1, 3600)?;
        }
        Ok(())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match non_empty_env(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| PushError::InvalidConfigValueError {
                field: name.to_string(),
                value: raw.clone(),
                reason: "could not parse value".to_string(),
            }),
    }
}

impl GatewaySettings for Settings {
    fn endpoint(&self) -> &str {
        self.gateway.endpoint.as_deref().unwrap_or(DEFAULT_FCM_ENDPOINT)
    }

    fn project_id(&self) -> &str {
        &self.gateway.project_id
    }

    fn access_token(&self) -> Option<&str> {
        self.gateway
            .access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }

    fn service_account_path(&self) -> Option<&str> {
        self.gateway.service_account_path.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.gateway.timeout_seconds.unwrap_or(30)
    }

    fn concurrency(&self) -> usize {
        self.gateway.concurrency.unwrap_or(16)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        self.validate_offline()?;

        validate_url("gateway.endpoint", self.endpoint())?;
        if let Some(path) = &self.gateway.service_account_path {
            validate_path("gateway.service_account_path", path)?;
        }
        // without credentials there is no other place to learn the project from
        if self.access_token().is_some() {
            validate_non_empty_string("gateway.project_id", &self.gateway.project_id)?;
        }
        validate_range("gateway.timeout_seconds", self.timeout_seconds(), 1, 300)?;
        validate_range("gateway.concurrency", self.concurrency(), 1, 500)?;

        tracing::debug!("Settings validation passed");
        Ok(())
    }
}
