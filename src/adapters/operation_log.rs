use crate::adapters::alert::WebhookAlert;
use crate::domain::ports::OperationLog;
use crate::utils::error::{Result, RotateError};
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 追加寫入的稽核日誌檔
///
/// 每行加上本地時間戳，空訊息寫成空行。寫入失敗只記錄到 tracing，
/// 不會中斷輪換。檔案在 drop 時關閉。
pub struct FileOperationLog {
    path: PathBuf,
    file: Mutex<File>,
    alert: Option<WebhookAlert>,
}

impl FileOperationLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
            alert: None,
        })
    }

    pub fn with_alert(mut self, alert: WebhookAlert) -> Self {
        self.alert = Some(alert);
        self
    }

    fn append(&self, message: &str) {
        let line = if message.is_empty() {
            "\n".to_string()
        } else {
            format!(
                "[{}] {}\n",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )
        };

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            tracing::error!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

#[async_trait]
impl OperationLog for FileOperationLog {
    async fn log_operation(&self, message: &str) {
        self.append(message);
    }

    async fn report_failure(&self, operation: &str, error: &RotateError) {
        self.append(&format!("[FAILURE] {}: {}", operation, error));
        tracing::error!(
            "🚨 {} failed (Category: {:?}): {}",
            operation,
            error.category(),
            error
        );

        if let Some(alert) = &self.alert {
            if let Err(e) = alert.send(operation, error).await {
                tracing::warn!("Failed to deliver failure alert: {}", e);
            }
        }
    }
}
