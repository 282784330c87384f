//! UCloud UCDN API client
//!
//! 所有請求都是對同一個端點的 JSON POST，以 `Action` 區分操作。
//! 簽名為參數依鍵名排序後串接 `key + value`，最後接上私鑰取 SHA-1。

use crate::config::AppConfig;
use crate::domain::model::HttpsState;
use crate::domain::ports::CdnControlPlane;
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, HashSet};

const ACTION_DOMAIN_CONFIG: &str = "GetUcdnDomainConfig";
const ACTION_UPDATE_HTTPS: &str = "UpdateUcdnDomainHttpsConfigV2";
const ACTION_DELETE_CERT: &str = "DeleteCertificateV2";
const ACTION_ADD_CERT: &str = "AddCertificate";

pub struct UcloudClient {
    http: Client,
    base_url: String,
    public_key: String,
    private_key: String,
    project_id: Option<String>,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    ret_code: i64,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DomainConfigResponse {
    #[serde(default)]
    domain_list: Vec<DomainConfig>,
    #[serde(default)]
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DomainConfig {
    domain_id: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    cert_name_cn: Option<String>,
    #[serde(default)]
    cert_name_abroad: Option<String>,
}

impl DomainConfig {
    fn uses_cert(&self, cert_name: &str) -> bool {
        self.cert_name_cn.as_deref() == Some(cert_name)
            || self.cert_name_abroad.as_deref() == Some(cert_name)
    }
}

pub fn signature(params: &BTreeMap<String, String>, private_key: &str) -> String {
    let mut hasher = Sha1::new();
    for (key, value) in params {
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    hasher.update(private_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl UcloudClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url().to_string(),
            public_key: config.ucloud.public_key.clone(),
            private_key: config.ucloud.private_key.clone(),
            project_id: config.ucloud.project_id.clone(),
            page_size: config.page_size(),
        })
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        mut params: BTreeMap<String, String>,
    ) -> Result<T> {
        params.insert("Action".to_string(), action.to_string());
        params.insert("PublicKey".to_string(), self.public_key.clone());
        if let Some(project_id) = &self.project_id {
            params.insert("ProjectId".to_string(), project_id.clone());
        }
        let sig = signature(&params, &self.private_key);
        params.insert("Signature".to_string(), sig);

        tracing::debug!("Calling UCloud {}", action);
        let response = self.http.post(&self.base_url).json(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RotateError::RemoteError {
                action: action.to_string(),
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        let body = response.text().await?;
        let envelope: Envelope = serde_json::from_str(&body)?;
        if envelope.ret_code != 0 {
            return Err(RotateError::RemoteError {
                action: action.to_string(),
                code: envelope.ret_code,
                message: envelope.message.unwrap_or_default(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// 證書與私鑰以原文上傳，不是 UTF-8 的內容直接拒絕
fn pem_text<'a>(field: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| RotateError::ValidationError {
        message: format!("{} is not valid UTF-8 text: {}", field, e),
    })
}

fn params<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl CdnControlPlane for UcloudClient {
    async fn discover_domains(&self, cert_name: &str) -> Result<Vec<String>> {
        let mut domain_ids: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut offset: u64 = 0;

        loop {
            let offset_str = offset.to_string();
            let limit_str = self.page_size.to_string();
            let page: DomainConfigResponse = self
                .invoke(
                    ACTION_DOMAIN_CONFIG,
                    params([("Offset", offset_str.as_str()), ("Limit", limit_str.as_str())]),
                )
                .await?;

            let fetched = page.domain_list.len() as u64;
            let mut fresh = 0usize;
            for domain in &page.domain_list {
                if seen.insert(domain.domain_id.clone()) {
                    fresh += 1;
                }
            }
            for domain in page.domain_list.into_iter().filter(|d| d.uses_cert(cert_name)) {
                if !domain_ids.contains(&domain.domain_id) {
                    tracing::debug!(
                        "Domain {} ({}) uses {}",
                        domain.domain_id,
                        domain.domain.as_deref().unwrap_or("-"),
                        cert_name
                    );
                    domain_ids.push(domain.domain_id);
                }
            }

            offset += fetched;
            let exhausted = match page.total_count {
                Some(total) => offset >= total,
                None => fetched < u64::from(self.page_size),
            };
            // 伺服器忽略 Offset 時會一直回傳同一頁
            if fetched == 0 || exhausted || fresh == 0 {
                break;
            }
        }

        Ok(domain_ids)
    }

    async fn set_https(
        &self,
        domain_id: &str,
        state: HttpsState,
        cert_name: Option<&str>,
    ) -> Result<()> {
        let mut request = params([("DomainId", domain_id), ("HttpsStatusCn", state.as_str())]);
        if let (HttpsState::Enable, Some(cert_name)) = (state, cert_name) {
            request.insert("CertName".to_string(), cert_name.to_string());
            request.insert("CertType".to_string(), "ucdn".to_string());
        }

        let _: IgnoredAny = self.invoke(ACTION_UPDATE_HTTPS, request).await?;
        Ok(())
    }

    async fn delete_certificate(&self, cert_name: &str) -> Result<()> {
        let _: IgnoredAny = self
            .invoke(ACTION_DELETE_CERT, params([("CertName", cert_name)]))
            .await?;
        Ok(())
    }

    async fn upload_certificate(&self, cert_name: &str, cert: &[u8], key: &[u8]) -> Result<()> {
        let cert = pem_text("certificate", cert)?;
        let key = pem_text("private key", key)?;
        let _: IgnoredAny = self
            .invoke(
                ACTION_ADD_CERT,
                params([
                    ("CertName", cert_name),
                    ("UserCert", cert),
                    ("PrivateKey", key),
                ]),
            )
            .await?;
        Ok(())
    }
}
