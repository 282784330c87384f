use crate::domain::model::HttpsState;
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;

pub trait CredentialStore: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// CDN 控制面的遠端操作
#[async_trait]
pub trait CdnControlPlane: Send + Sync {
    async fn discover_domains(&self, cert_name: &str) -> Result<Vec<String>>;

    /// 關閉時 `cert_name` 為 `None`
    async fn set_https(
        &self,
        domain_id: &str,
        state: HttpsState,
        cert_name: Option<&str>,
    ) -> Result<()>;

    async fn delete_certificate(&self, cert_name: &str) -> Result<()>;

    async fn upload_certificate(&self, cert_name: &str, cert: &[u8], key: &[u8]) -> Result<()>;
}

/// 稽核日誌與失敗告警
#[async_trait]
pub trait OperationLog: Send + Sync {
    async fn log_operation(&self, message: &str);

    async fn report_failure(&self, operation: &str, error: &RotateError);
}
