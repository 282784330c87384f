use crate::domain::model::Phase;
use std::time::Duration;

/// 每種變更操作之後等待控制面狀態收斂的時間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationPolicy {
    pub after_disable: Duration,
    pub after_delete: Duration,
    pub after_upload: Duration,
    pub after_enable: Duration,
}

impl PropagationPolicy {
    /// 不等待，用於測試
    pub fn immediate() -> Self {
        Self {
            after_disable: Duration::ZERO,
            after_delete: Duration::ZERO,
            after_upload: Duration::ZERO,
            after_enable: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, phase: Phase) -> Duration {
        match phase {
            Phase::ResolveDomains => Duration::ZERO,
            Phase::DisableHttps => self.after_disable,
            Phase::DeleteCertificate => self.after_delete,
            // 新證書需要較長時間才能綁定到網域
            Phase::UploadCertificate => self.after_upload,
            Phase::EnableHttps => self.after_enable,
        }
    }
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        Self {
            after_disable: Duration::from_secs(2),
            after_delete: Duration::from_secs(2),
            after_upload: Duration::from_secs(30),
            after_enable: Duration::from_secs(5),
        }
    }
}
