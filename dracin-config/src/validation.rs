//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate an HTTP(S) URL
pub fn validate_http_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(url, field_name, domain)?;

    let parsed = url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::DomainError {
                domain: domain.to_string(),
                message: format!(
                    "{} scheme '{}' not allowed (only http/https)",
                    field_name, scheme
                ),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must have a valid host", field_name),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert!(validate_required_string("value", "field", "test").is_ok());
        assert!(validate_required_string("", "field", "test").is_err());
        assert!(validate_required_string("   ", "field", "test").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(1, "field", "test").is_ok());
        assert!(validate_positive(0.5, "field", "test").is_ok());
        assert!(validate_positive(0, "field", "test").is_err());
        assert!(validate_positive(-1.0, "field", "test").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://dracinshort.xyz", "host", "target").is_ok());
        assert!(validate_http_url("http://127.0.0.1:8080", "host", "target").is_ok());
        assert!(validate_http_url("ftp://dracinshort.xyz", "host", "target").is_err());
        assert!(validate_http_url("not-a-url", "host", "target").is_err());
        assert!(validate_http_url("", "host", "target").is_err());
    }
}
