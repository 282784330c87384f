use crate::utils::error::{Result, RotateError};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 遠端變更操作的單一寫入者邊界
///
/// 所有會改變控制面狀態的呼叫都經過同一個單許可信號量，
/// 多個輪換共用同一個 gate 時，同一時間只會有一個變更在進行。
/// 許可只在呼叫期間持有，不跨越等待生效的延遲。
#[derive(Debug, Clone)]
pub struct MutationGate {
    permits: Arc<Semaphore>,
}

impl MutationGate {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    pub async fn run<F, T>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RotateError::Cancelled {
                operation: "mutation gate".to_string(),
            })?;
        call.await
    }

    pub fn is_idle(&self) -> bool {
        self.permits.available_permits() == 1
    }
}

impl Default for MutationGate {
    fn default() -> Self {
        Self::new()
    }
}
