use std::fmt;
use thiserror::Error;

/// Failure reported by one remote call against the container API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub operation: &'static str,
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} failed ({}): {}", self.operation, code, self.message),
            None => write!(f, "{} failed: {}", self.operation, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Error, Debug)]
pub enum DescriberError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unable to create ECS client for region {region}: {message}")]
    ClientInitError { region: String, message: String },

    #[error("Unable to list services in cluster {cluster}: {source}")]
    ListServicesError {
        cluster: String,
        #[source]
        source: ApiError,
    },

    #[error("Unable to describe services in cluster {cluster}: {source}")]
    DescribeServicesError {
        cluster: String,
        #[source]
        source: ApiError,
    },

    #[error("No services found in cluster {cluster}")]
    NoServicesFoundError { cluster: String },

    #[error("Unable to list tasks for service {service} in cluster {cluster}: {source}")]
    ListTasksError {
        cluster: String,
        service: String,
        #[source]
        source: ApiError,
    },

    #[error("Unable to describe tasks for service {service} in cluster {cluster}: {source}")]
    DescribeTasksError {
        cluster: String,
        service: String,
        #[source]
        source: ApiError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Remote,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DescriberError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ClientInitError { .. }
            | Self::ListServicesError { .. }
            | Self::DescribeServicesError { .. }
            | Self::ListTasksError { .. }
            | Self::DescribeTasksError { .. } => ErrorCategory::Remote,
            Self::NoServicesFoundError { .. } | Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Data => match self {
                Self::NoServicesFoundError { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::Critical,
            },
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Exit code for the CLI: configuration 1, remote 2, everything local 3.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigError { .. } | Self::MissingConfigError { .. } => {
                "Pass --region and --cluster, or set them in the config file"
            }
            Self::InvalidConfigValueError { .. } => "Correct the named field and try again",
            Self::ClientInitError { .. } => {
                "Check AWS credentials (environment, shared config or instance profile) and the profile name"
            }
            Self::ListServicesError { .. } | Self::DescribeServicesError { .. } => {
                "Verify the cluster exists in this region and the caller may read it (ecs:ListServices, ecs:DescribeServices)"
            }
            Self::NoServicesFoundError { .. } => {
                "The cluster has no services; use --allow-empty-cluster to accept an empty result"
            }
            Self::ListTasksError { .. } | Self::DescribeTasksError { .. } => {
                "Verify the caller may read tasks (ecs:ListTasks, ecs:DescribeTasks)"
            }
            Self::SerializationError(_) => "Report this as a bug together with the cluster layout",
            Self::IoError(_) => "Check the output path exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::MissingConfigError { field } => format!("Missing required setting '{}'", field),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            Self::ClientInitError { region, .. } => {
                format!("Could not connect to ECS in {}", region)
            }
            Self::ListServicesError { cluster, source }
            | Self::DescribeServicesError { cluster, source } => {
                format!("ECS rejected a request for cluster '{}': {}", cluster, source)
            }
            Self::NoServicesFoundError { cluster } => {
                format!("Cluster '{}' has no services", cluster)
            }
            Self::ListTasksError { service, source, .. }
            | Self::DescribeTasksError { service, source, .. } => {
                format!("Could not read tasks of service '{}': {}", service, source)
            }
            Self::SerializationError(e) => format!("Could not render the snapshot: {}", e),
            Self::IoError(e) => format!("Could not write output: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, DescriberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_includes_code() {
        let err = ApiError::new("ListServices", "Cluster not found.").with_code("ClusterNotFoundException");
        assert_eq!(
            err.to_string(),
            "ListServices failed (ClusterNotFoundException): Cluster not found."
        );
        assert_eq!(
            ApiError::new("ListTasks", "timeout").to_string(),
            "ListTasks failed: timeout"
        );
    }

    #[test]
    fn test_remote_errors_name_the_failed_call() {
        let err = DescriberError::DescribeServicesError {
            cluster: "demo".to_string(),
            source: ApiError::new("DescribeServices", "boom"),
        };
        let text = err.to_string();
        assert!(text.contains("describe services"));
        assert!(text.contains("demo"));
        assert!(text.contains("boom"));
        assert_eq!(err.category(), ErrorCategory::Remote);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        assert_eq!(DescriberError::config("x").exit_code(), 1);
        assert_eq!(
            DescriberError::NoServicesFoundError {
                cluster: "c".to_string()
            }
            .exit_code(),
            2
        );
        let io = DescriberError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.category(), ErrorCategory::System);
        assert_eq!(io.exit_code(), 3);

        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(DescriberError::from(serde_err).exit_code(), 3);
    }
}
