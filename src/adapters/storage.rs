use crate::domain::ports::CredentialStore;
use crate::utils::error::{Result, RotateError};
use std::path::{Path, PathBuf};

/// 從本機讀取證書與私鑰，相對路徑以 `base_path` 為基準
#[derive(Debug, Clone)]
pub struct LocalCredentialStore {
    base_path: PathBuf,
}

impl LocalCredentialStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl CredentialStore for LocalCredentialStore {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(&full_path).await?;

        if data.is_empty() {
            return Err(RotateError::ValidationError {
                message: format!("{} is empty", full_path.display()),
            });
        }

        tracing::debug!("Read {} bytes from {}", data.len(), full_path.display());
        Ok(data)
    }
}
