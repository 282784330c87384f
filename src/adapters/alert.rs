use crate::utils::error::{Result, RotateError};
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AlertPayload<'a> {
    pub operation: &'a str,
    pub error: String,
    pub category: String,
    pub timestamp: String,
}

/// 失敗告警，POST JSON 到設定的 webhook
#[derive(Debug, Clone)]
pub struct WebhookAlert {
    client: Client,
    url: String,
}

impl WebhookAlert {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub async fn send(&self, operation: &str, error: &RotateError) -> Result<()> {
        let payload = AlertPayload {
            operation,
            error: error.to_string(),
            category: format!("{:?}", error.category()),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RotateError::RemoteError {
                action: "alert webhook".to_string(),
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }
        Ok(())
    }
}
