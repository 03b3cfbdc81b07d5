use crate::utils::error::{CondoTvError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CondoTvError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
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
        return Err(CondoTvError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Connection codes are the five-digit numbers TVs type in when pairing.
pub fn validate_connection_code(code: &str) -> Result<()> {
    if code.len() != 5 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(CondoTvError::ValidationError {
            message: format!("Connection code must be five digits, got '{}'", code),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("news.feeds.url", "https://example.com").is_ok());
        assert!(validate_url("news.feeds.url", "http://example.com").is_ok());
        assert!(validate_url("news.feeds.url", "").is_err());
        assert!(validate_url("news.feeds.url", "invalid-url").is_err());
        assert!(validate_url("news.feeds.url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("playlist.min_target_size", 30, 1).is_ok());
        assert!(validate_positive_number("playlist.min_target_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("display_seconds", 10, 1, 300).is_ok());
        assert!(validate_range("display_seconds", 301, 1, 300).is_err());
    }

    #[test]
    fn test_validate_connection_code() {
        assert!(validate_connection_code("48213").is_ok());
        assert!(validate_connection_code("4821").is_err());
        assert!(validate_connection_code("48a13").is_err());
    }
}
