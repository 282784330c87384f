use crate::core::control::RunControl;
use crate::domain::model::{DomainSet, Phase, PhaseOutcome};
use crate::domain::ports::{CdnControlPlane, OperationLog};

/// 決定本次要操作的網域
///
/// 指定了網域 ID 時直接使用，不呼叫遠端；否則依證書名稱查詢。
/// 查詢失敗或沒有結果都不會中止，後續仍會處理證書本身。
/// 只有取消會被視為致命結果。
pub async fn resolve_domains<C, L>(
    client: &C,
    log: &L,
    control: &RunControl,
    domain_id: Option<&str>,
    cert_name: &str,
) -> (DomainSet, PhaseOutcome)
where
    C: CdnControlPlane + ?Sized,
    L: OperationLog + ?Sized,
{
    let phase = Phase::ResolveDomains;

    if let Some(domain_id) = domain_id {
        tracing::debug!("Using explicit domain {}", domain_id);
        return (
            vec![domain_id.to_string()],
            PhaseOutcome::Success {
                phase,
                domain: Some(domain_id.to_string()),
            },
        );
    }

    tracing::info!("🔍 Discovering domains bound to certificate {}", cert_name);
    match control
        .call(phase.operation(), client.discover_domains(cert_name))
        .await
    {
        Ok(domains) => {
            if domains.is_empty() {
                log.log_operation("未找到任何域名 ID, 继续执行后续操作").await;
                tracing::warn!("No domains found for certificate {}", cert_name);
            } else {
                tracing::info!("Found {} domain(s): {:?}", domains.len(), domains);
            }
            (domains, PhaseOutcome::Success { phase, domain: None })
        }
        Err(error) => {
            log.log_operation(&format!("获取域名 ID 失败: {}", error))
                .await;
            tracing::warn!("Domain discovery failed, continuing without domains: {}", error);
            let outcome = if error.is_cancelled() {
                PhaseOutcome::Fatal {
                    phase,
                    domain: None,
                    error,
                }
            } else {
                PhaseOutcome::Recoverable {
                    phase,
                    domain: None,
                    error,
                }
            };
            (Vec::new(), outcome)
        }
    }
}
