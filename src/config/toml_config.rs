use crate::core::propagation::PropagationPolicy;
use crate::utils::error::{Result, RotateError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.ucloud.cn";
pub const DEFAULT_OPERATION_LOG: &str = "operation_log.txt";
const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub ucloud: UcloudConfig,
    pub propagation: Option<PropagationConfig>,
    pub limits: Option<LimitsConfig>,
    pub log: Option<LogConfig>,
    pub alert: Option<AlertConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UcloudConfig {
    pub public_key: String,
    pub private_key: String,
    pub project_id: Option<String>,
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
}

/// 單位為秒
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropagationConfig {
    pub after_disable: Option<u64>,
    pub after_delete: Option<u64>,
    pub after_upload: Option<u64>,
    pub after_enable: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub request_timeout: Option<u64>,
    pub run_timeout: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub operation_log: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    pub webhook_url: Option<String>,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| RotateError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RotateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UCLOUD_PRIVATE_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RotateError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_secret("ucloud.public_key", &self.ucloud.public_key)?;
        validate_secret("ucloud.private_key", &self.ucloud.private_key)?;
        validate_url("ucloud.base_url", self.base_url())?;
        if let Some(page_size) = self.ucloud.page_size {
            validate_range("ucloud.page_size", page_size, 1, 1000)?;
        }

        validate_path("log.operation_log", self.operation_log_path())?;

        if let Some(url) = self.webhook_url() {
            validate_url("alert.webhook_url", url)?;
        }

        for (field, value) in [
            ("limits.request_timeout", self.limits.as_ref().and_then(|l| l.request_timeout)),
            ("limits.run_timeout", self.limits.as_ref().and_then(|l| l.run_timeout)),
        ] {
            if let Some(secs) = value {
                validate_range(field, secs, 1, 86_400)?;
            }
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.ucloud.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn page_size(&self) -> u32 {
        self.ucloud.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn operation_log_path(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|l| l.operation_log.as_deref())
            .unwrap_or(DEFAULT_OPERATION_LOG)
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.alert.as_ref().and_then(|a| a.webhook_url.as_deref())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.limits
            .as_ref()
            .and_then(|l| l.request_timeout)
            .map(Duration::from_secs)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        self.limits
            .as_ref()
            .and_then(|l| l.run_timeout)
            .map(Duration::from_secs)
    }

    /// 未設定的項目使用預設延遲
    pub fn propagation_policy(&self) -> PropagationPolicy {
        let defaults = PropagationPolicy::default();
        let Some(p) = self.propagation.as_ref() else {
            return defaults;
        };
        let secs = |value: Option<u64>, fallback: Duration| {
            value.map(Duration::from_secs).unwrap_or(fallback)
        };

        PropagationPolicy {
            after_disable: secs(p.after_disable, defaults.after_disable),
            after_delete: secs(p.after_delete, defaults.after_delete),
            after_upload: secs(p.after_upload, defaults.after_upload),
            after_enable: secs(p.after_enable, defaults.after_enable),
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
