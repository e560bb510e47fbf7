use crate::utils::error::{DescriberError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> DescriberError {
    DescriberError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
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

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| DescriberError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    // e.g. us-east-1, eu-central-2, us-gov-west-1
    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            field_name,
            region,
            "AWS region can only contain lowercase letters, numbers, and hyphens",
        ));
    }

    if region.starts_with('-') || region.ends_with('-') {
        return Err(invalid(
            field_name,
            region,
            "AWS region cannot start or end with a hyphen",
        ));
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
            &value.to_string(),
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
        assert!(validate_url("endpoint_url", "https://ecs.us-east-1.amazonaws.com").is_ok());
        assert!(validate_url("endpoint_url", "http://localhost:4566").is_ok());
        assert!(validate_url("endpoint_url", "").is_err());
        assert!(validate_url("endpoint_url", "invalid-url").is_err());
        assert!(validate_url("endpoint_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_aws_region() {
        assert!(validate_aws_region("region", "us-east-1").is_ok());
        assert!(validate_aws_region("region", "us-gov-west-1").is_ok());
        assert!(validate_aws_region("region", "").is_err());
        assert!(validate_aws_region("region", "US-EAST-1").is_err());
        assert!(validate_aws_region("region", "us east 1").is_err());
        assert!(validate_aws_region("region", "-us-east-1").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("max_attempts", 3u32, 1, 10).is_ok());
        assert!(validate_range("max_attempts", 0u32, 1, 10).is_err());
        assert!(validate_range("max_attempts", 11u32, 1, 10).is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("demo".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("cluster", &present).unwrap(), "demo");
        match validate_required_field("cluster", &missing) {
            Err(DescriberError::MissingConfigError { field }) => assert_eq!(field, "cluster"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./snapshot.json").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }
}
