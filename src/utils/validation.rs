use crate::utils::error::{PushError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> PushError {
    PushError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Accepts absolute `http`/`https` URLs only.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PushError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("gateway.endpoint", "https://fcm.googleapis.com").is_ok());
        assert!(validate_url("gateway.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("gateway.endpoint", "").is_err());
        assert!(validate_url("gateway.endpoint", "fcm.googleapis.com").is_err());
        assert!(validate_url("gateway.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("gateway.project_id", "demo").is_ok());
        let err = validate_non_empty_string("gateway.project_id", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Missing required configuration: gateway.project_id");
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("gateway.concurrency", 16usize, 1, 500).is_ok());
        assert!(validate_range("gateway.concurrency", 0usize, 1, 500).is_err());
        assert!(validate_range("gateway.concurrency", 501usize, 1, 500).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("templates.path", "assets/messages.toml").is_ok());
        assert!(validate_path("templates.path", "").is_err());
        assert!(validate_path("templates.path", "bad\0path").is_err());
    }
}
