use crate::utils::error::{Result, RotateError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 取消與期限控制，貫穿每個遠端呼叫與等待
#[derive(Debug, Clone)]
pub struct RunControl {
    cancel: CancellationToken,
    request_timeout: Option<Duration>,
    deadline: Option<Instant>,
}

impl RunControl {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            request_timeout: None,
            deadline: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// 整次執行的期限，從呼叫時開始計算
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    fn budget(&self) -> Option<Duration> {
        match (self.request_timeout, self.remaining()) {
            (Some(request), Some(remaining)) => Some(request.min(remaining)),
            (request, remaining) => request.or(remaining),
        }
    }

    /// 執行一個遠端呼叫，逾時回傳 `Timeout`，取消回傳 `Cancelled`
    pub async fn call<F, T>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(cancelled(operation));
        }

        let budget = self.budget();
        let bounded = async {
            match budget {
                Some(after) => tokio::time::timeout(after, call)
                    .await
                    .map_err(|_| RotateError::Timeout {
                        operation: operation.to_string(),
                        after,
                    })?,
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(cancelled(operation)),
            result = bounded => result,
        }
    }

    /// 等待生效延遲；期限不足時提前以 `Timeout` 結束
    pub async fn settle(&self, operation: &str, delay: Duration) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(cancelled(operation));
        }
        if delay.is_zero() {
            return Ok(());
        }

        let (wait, cut_short) = match self.remaining() {
            Some(remaining) if remaining < delay => (remaining, true),
            _ => (delay, false),
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(cancelled(operation)),
            _ = tokio::time::sleep(wait) => {
                if cut_short {
                    Err(RotateError::Timeout {
                        operation: operation.to_string(),
                        after: wait,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new(CancellationToken::new())
    }
}

fn cancelled(operation: &str) -> RotateError {
    RotateError::Cancelled {
        operation: operation.to_string(),
    }
}
