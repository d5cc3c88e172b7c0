use crate::utils::error::{QaError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(QaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(QaError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Expected one of: {}", allowed.join(", ")),
    })
}

/// Extensions are given bare (`txt`, not `.txt`) and must not repeat.
pub fn validate_extensions(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one file extension is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for ext in extensions {
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(QaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Extensions must be bare names such as 'txt'".to_string(),
            });
        }
        if !seen.insert(ext.to_lowercase()) {
            return Err(QaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Duplicate extension".to_string(),
            });
        }
    }

    Ok(())
}

/// Returns the value if it is present, non-blank and not an unresolved `${VAR}`.
pub fn validate_required_secret<'a>(field_name: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() && !(v.starts_with("${") && v.ends_with('}')) => Ok(v),
        _ => Err(QaError::MissingConfigError {
            field: field_name.to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QaError::InvalidConfigValueError {
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
        return Err(QaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("openai.base_url", "https://api.openai.com/v1").is_ok());
        assert!(validate_url("openai.base_url", "http://localhost:8080").is_ok());
        assert!(validate_url("openai.base_url", "").is_err());
        assert!(validate_url("openai.base_url", "invalid-url").is_err());
        assert!(validate_url("openai.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("chunking.upsert_batch_size", 100, 1).is_ok());
        assert!(validate_positive_number("chunking.upsert_batch_size", 0, 1).is_err());
    }

    #[test]
    fn test_validate_extensions() {
        let ok = vec!["txt".to_string(), "md".to_string()];
        assert!(validate_extensions("documents.extensions", &ok).is_ok());

        assert!(validate_extensions("documents.extensions", &[]).is_err());
        assert!(validate_extensions("documents.extensions", &[".txt".to_string()]).is_err());
        let dup = vec!["md".to_string(), "MD".to_string()];
        assert!(validate_extensions("documents.extensions", &dup).is_err());
    }

    #[test]
    fn test_validate_required_secret() {
        assert_eq!(
            validate_required_secret("openai.api_key", &Some("sk-123".to_string())).unwrap(),
            "sk-123"
        );
        assert!(validate_required_secret("openai.api_key", &None).is_err());
        assert!(validate_required_secret("openai.api_key", &Some("  ".to_string())).is_err());
        assert!(
            validate_required_secret("openai.api_key", &Some("${OPENAI_API_KEY}".to_string()))
                .is_err()
        );
    }

    #[test]
    fn test_validate_one_of_and_range() {
        assert!(validate_one_of("index.metric", "cosine", &["cosine", "dotproduct"]).is_ok());
        assert!(validate_one_of("index.metric", "manhattan", &["cosine"]).is_err());
        assert!(validate_range("query.top_k", 10, 1, 10_000).is_ok());
        assert!(validate_range("query.top_k", 0, 1, 10_000).is_err());
    }
}
