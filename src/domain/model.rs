use crate::utils::error::RotateError;
use std::fmt;

/// 一次輪換所需的全部輸入
#[derive(Debug, Clone)]
pub struct RotationRequest {
    pub domain_id: Option<String>,
    pub cert_name: String,
    pub cert: Vec<u8>,
    pub key: Vec<u8>,
}

impl RotationRequest {
    /// 空字串的網域 ID 視為未指定
    pub fn new(
        domain_id: Option<&str>,
        cert_name: &str,
        cert: Vec<u8>,
        key: Vec<u8>,
    ) -> crate::utils::error::Result<Self> {
        for (field, empty) in [
            ("certName", cert_name.trim().is_empty()),
            ("cert", cert.is_empty()),
            ("key", key.is_empty()),
        ] {
            if empty {
                return Err(RotateError::ValidationError {
                    message: format!("{} must not be empty", field),
                });
            }
        }

        Ok(Self {
            domain_id: domain_id.filter(|id| !id.is_empty()).map(str::to_string),
            cert_name: cert_name.to_string(),
            cert,
            key,
        })
    }
}

/// 要操作的網域 ID，依序處理
pub type DomainSet = Vec<String>;

/// `HttpsStatusCn` 的取值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpsState {
    Enable,
    Disable,
}

impl HttpsState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpsState::Enable => "enable",
            HttpsState::Disable => "disable",
        }
    }
}

impl fmt::Display for HttpsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolveDomains,
    DisableHttps,
    DeleteCertificate,
    UploadCertificate,
    EnableHttps,
}

impl Phase {
    /// 對應的 UCloud 操作名稱，也用於失敗回報
    pub fn operation(&self) -> &'static str {
        match self {
            Phase::ResolveDomains => "GetDomainIDsForCert",
            Phase::DisableHttps | Phase::EnableHttps => "ChangeHttps",
            Phase::DeleteCertificate => "DeleteCert",
            Phase::UploadCertificate => "UploadCert",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ResolveDomains => "resolve-domains",
            Phase::DisableHttps => "disable-https",
            Phase::DeleteCertificate => "delete-certificate",
            Phase::UploadCertificate => "upload-certificate",
            Phase::EnableHttps => "enable-https",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum PhaseOutcome {
    Success {
        phase: Phase,
        domain: Option<String>,
    },
    Recoverable {
        phase: Phase,
        domain: Option<String>,
        error: RotateError,
    },
    Fatal {
        phase: Phase,
        domain: Option<String>,
        error: RotateError,
    },
}

impl PhaseOutcome {
    pub fn phase(&self) -> Phase {
        match self {
            PhaseOutcome::Success { phase, .. }
            | PhaseOutcome::Recoverable { phase, .. }
            | PhaseOutcome::Fatal { phase, .. } => *phase,
        }
    }

    pub fn domain(&self) -> Option<&str> {
        match self {
            PhaseOutcome::Success { domain, .. }
            | PhaseOutcome::Recoverable { domain, .. }
            | PhaseOutcome::Fatal { domain, .. } => domain.as_deref(),
        }
    }

    pub fn error(&self) -> Option<&RotateError> {
        match self {
            PhaseOutcome::Success { .. } => None,
            PhaseOutcome::Recoverable { error, .. } | PhaseOutcome::Fatal { error, .. } => {
                Some(error)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PhaseOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Completed,
    Aborted { phase: Phase },
}

/// 一次輪換的結構化結果
#[derive(Debug)]
pub struct RotationReport {
    pub cert_name: String,
    pub domains: DomainSet,
    pub outcomes: Vec<PhaseOutcome>,
    pub state: RunState,
}

impl RotationReport {
    pub fn is_completed(&self) -> bool {
        self.state == RunState::Completed
    }

    pub fn outcomes_for(&self, phase: Phase) -> impl Iterator<Item = &PhaseOutcome> {
        self.outcomes.iter().filter(move |o| o.phase() == phase)
    }

    pub fn failed_domains(&self, phase: Phase) -> Vec<&str> {
        self.outcomes_for(phase)
            .filter(|o| !o.is_success())
            .filter_map(|o| o.domain())
            .collect()
    }
}
