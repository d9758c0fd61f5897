use crate::core::GatewaySettings;
use crate::utils::error::{PushError, Result};
use gcp_auth::{CustomServiceAccount, TokenProvider};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Where FCM bearer tokens come from.
#[derive(Clone)]
pub enum Credentials {
    /// Token from configuration, sent as is and never refreshed.
    Static(String),
    /// Service account or application default credentials. The provider
    /// caches minted tokens and renews them shortly before they expire.
    Provider(Arc<dyn TokenProvider>),
}

impl Credentials {
    /// A configured access token wins, then a service account file, then
    /// application default credentials.
    pub async fn from_settings(settings: &impl GatewaySettings) -> Result<Self> {
        if let Some(token) = settings.access_token() {
            tracing::info!("🔑 Using fixed access token from configuration");
            return Ok(Self::Static(token.to_string()));
        }

        if let Some(path) = settings.service_account_path() {
            tracing::info!("🔑 Loading service account from: {}", path);
            return Self::service_account(path);
        }

        tracing::info!("🔑 Looking up application default credentials");
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| PushError::config(format!("no Google credentials available: {}", e)))?;
        Ok(Self::Provider(provider))
    }

    pub fn service_account(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            PushError::config(format!(
                "invalid service account file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::Provider(Arc::new(account)))
    }

    pub async fn bearer(&self) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::Provider(provider) => {
                let token = provider.token(&[FCM_SCOPE]).await.map_err(|e| {
                    PushError::gateway(format!("could not obtain access token: {}", e))
                })?;
                Ok(token.as_str().to_string())
            }
        }
    }

    /// Project named by the credentials, if they carry one.
    pub async fn project_id(&self) -> Option<String> {
        match self {
            Self::Static(_) => None,
            Self::Provider(provider) => provider.project_id().await.ok().map(|id| id.to_string()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(_) => f.write_str("Credentials::Static(..)"),
            Self::Provider(_) => f.write_str("Credentials::Provider(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_is_not_printed() {
        let credentials = Credentials::Static("secret-token".to_string());
        assert!(!format!("{:?}", credentials).contains("secret-token"));
    }

    #[tokio::test]
    async fn test_static_token_is_returned_as_is() {
        let credentials = Credentials::Static("fixed".to_string());
        assert_eq!(credentials.bearer().await.unwrap(), "fixed");
        assert!(credentials.project_id().await.is_none());
    }

    #[test]
    fn test_missing_service_account_file_is_a_config_error() {
        let err = Credentials::service_account("/nonexistent/service-account.json").unwrap_err();
        assert!(matches!(err, PushError::ConfigError { .. }));
        assert!(err.to_string().contains("/nonexistent/service-account.json"));
    }
}
