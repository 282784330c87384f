use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotateError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("UCloud {action} failed (RetCode {code}): {message}")]
    RemoteError {
        action: String,
        code: i64,
        message: String,
    },

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("{operation} was cancelled")]
    Cancelled { operation: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Remote,
    Interrupted,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RotateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RotateError::ConfigError { .. }
            | RotateError::ConfigValidationError { .. }
            | RotateError::MissingConfigError { .. }
            | RotateError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RotateError::ValidationError { .. } => ErrorCategory::Input,
            RotateError::HttpError(_) | RotateError::SerializationError(_) => {
                ErrorCategory::Network
            }
            RotateError::RemoteError { .. } => ErrorCategory::Remote,
            RotateError::Timeout { .. } | RotateError::Cancelled { .. } => {
                ErrorCategory::Interrupted
            }
            RotateError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Interrupted => ErrorSeverity::Medium,
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RotateError::Cancelled { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TOML config file and the environment variables it references"
            }
            ErrorCategory::Input => "Check the certificate name and the cert/key file paths",
            ErrorCategory::Network => "Check network connectivity to the UCloud API endpoint",
            ErrorCategory::Remote => {
                "Check the UCloud console; affected domains may need HTTPS re-enabled manually"
            }
            ErrorCategory::Interrupted => {
                "The run was interrupted; inspect operation_log.txt before re-running"
            }
            ErrorCategory::System => "Check file permissions and the working directory",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RotateError::MissingConfigError { field } => {
                format!("配置缺少必要欄位: {}", field)
            }
            RotateError::InvalidConfigValueError { field, reason, .. } => {
                format!("配置欄位 {} 無效: {}", field, reason)
            }
            RotateError::RemoteError {
                action, message, ..
            } => format!("UCloud 介面 {} 回傳錯誤: {}", action, message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RotateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interruptions_are_distinct_from_remote_failures() {
        let timeout = RotateError::Timeout {
            operation: "DeleteCertificateV2".to_string(),
            after: Duration::from_secs(3),
        };
        let remote = RotateError::RemoteError {
            action: "DeleteCertificateV2".to_string(),
            code: 8039,
            message: "cert in use".to_string(),
        };

        assert!(!timeout.is_cancelled());
        assert!(!remote.is_cancelled());
        assert_eq!(timeout.category(), ErrorCategory::Interrupted);
        assert_eq!(remote.category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_setup_errors_outrank_remote_failures() {
        let missing = RotateError::MissingConfigError {
            field: "ucloud.public_key".to_string(),
        };
        let cancelled = RotateError::Cancelled {
            operation: "AddCertificate".to_string(),
        };
        let io = RotateError::IoError(std::io::Error::other("disk full"));

        assert_eq!(missing.severity(), ErrorSeverity::High);
        assert_eq!(cancelled.severity(), ErrorSeverity::Medium);
        assert!(io.severity() > missing.severity());
    }

    #[test]
    fn test_remote_error_display() {
        let err = RotateError::RemoteError {
            action: "AddCertificate".to_string(),
            code: 160,
            message: "invalid cert".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "UCloud AddCertificate failed (RetCode 160): invalid cert"
        );
    }
}
