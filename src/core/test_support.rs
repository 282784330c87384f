use crate::core::gate::MutationGate;
use crate::domain::model::HttpsState;
use crate::domain::ports::{CdnControlPlane, OperationLog};
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Discover(String),
    Disable(String),
    Enable(String, String),
    Delete(String),
    Upload(String),
}

#[derive(Default)]
struct Script {
    discovered: Vec<String>,
    fail_discovery: bool,
    fail_disable: HashSet<String>,
    fail_enable: HashSet<String>,
    fail_delete: bool,
    fail_upload: bool,
    hang_delete: bool,
    watched_gate: Option<MutationGate>,
    gate_held: Vec<bool>,
}

/// 依腳本回應的假控制面，記錄每一次呼叫
#[derive(Clone, Default)]
pub struct FakeControlPlane {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

fn remote(action: &str) -> RotateError {
    RotateError::RemoteError {
        action: action.to_string(),
        code: 160,
        message: "scripted failure".to_string(),
    }
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    fn edit(self, f: impl FnOnce(&mut Script)) -> Self {
        f(&mut *self.script.lock().unwrap());
        self
    }

    pub fn with_discovered(self, domains: &[&str]) -> Self {
        self.edit(|s| s.discovered = domains.iter().map(|d| d.to_string()).collect())
    }

    pub fn fail_discovery(self) -> Self {
        self.edit(|s| s.fail_discovery = true)
    }

    pub fn fail_disable(self, domain: &str) -> Self {
        self.edit(|s| {
            s.fail_disable.insert(domain.to_string());
        })
    }

    pub fn fail_enable(self, domain: &str) -> Self {
        self.edit(|s| {
            s.fail_enable.insert(domain.to_string());
        })
    }

    pub fn fail_delete(self) -> Self {
        self.edit(|s| s.fail_delete = true)
    }

    pub fn fail_upload(self) -> Self {
        self.edit(|s| s.fail_upload = true)
    }

    pub fn hang_delete(self) -> Self {
        self.edit(|s| s.hang_delete = true)
    }

    /// 每次呼叫時記錄 gate 是否被持有
    pub fn watch_gate(self, gate: &MutationGate) -> Self {
        let gate = gate.clone();
        self.edit(|s| s.watched_gate = Some(gate))
    }

    pub fn gate_held(&self) -> Vec<bool> {
        self.script.lock().unwrap().gate_held.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        let mut script = self.script.lock().unwrap();
        if let Some(held) = script.watched_gate.as_ref().map(|g| !g.is_idle()) {
            script.gate_held.push(held);
        }
    }
}

#[async_trait]
impl CdnControlPlane for FakeControlPlane {
    async fn discover_domains(&self, cert_name: &str) -> Result<Vec<String>> {
        self.record(Call::Discover(cert_name.to_string()));
        let script = self.script.lock().unwrap();
        if script.fail_discovery {
            return Err(remote("GetUcdnDomainConfig"));
        }
        Ok(script.discovered.clone())
    }

    async fn set_https(
        &self,
        domain_id: &str,
        state: HttpsState,
        cert_name: Option<&str>,
    ) -> Result<()> {
        let failing = match state {
            HttpsState::Disable => {
                self.record(Call::Disable(domain_id.to_string()));
                self.script.lock().unwrap().fail_disable.contains(domain_id)
            }
            HttpsState::Enable => {
                self.record(Call::Enable(
                    domain_id.to_string(),
                    cert_name.unwrap_or_default().to_string(),
                ));
                self.script.lock().unwrap().fail_enable.contains(domain_id)
            }
        };
        if failing {
            return Err(remote("UpdateUcdnDomainHttpsConfigV2"));
        }
        Ok(())
    }

    async fn delete_certificate(&self, cert_name: &str) -> Result<()> {
        self.record(Call::Delete(cert_name.to_string()));
        let (fail, hang) = {
            let script = self.script.lock().unwrap();
            (script.fail_delete, script.hang_delete)
        };
        if hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if fail {
            return Err(remote("DeleteCertificateV2"));
        }
        Ok(())
    }

    async fn upload_certificate(&self, cert_name: &str, _cert: &[u8], _key: &[u8]) -> Result<()> {
        self.record(Call::Upload(cert_name.to_string()));
        if self.script.lock().unwrap().fail_upload {
            return Err(remote("AddCertificate"));
        }
        Ok(())
    }
}

/// 記憶體中的操作日誌
#[derive(Clone, Default)]
pub struct MemoryLog {
    lines: Arc<Mutex<Vec<String>>>,
    failures: Arc<Mutex<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperationLog for MemoryLog {
    async fn log_operation(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    async fn report_failure(&self, operation: &str, _error: &RotateError) {
        self.failures.lock().unwrap().push(operation.to_string());
    }
}
