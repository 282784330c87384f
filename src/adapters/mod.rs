// Adapters layer: concrete implementations of the domain ports (UCloud API, local files, alerting).

pub mod alert;
pub mod operation_log;
pub mod storage;
pub mod ucloud;

pub use operation_log::FileOperationLog;
pub use storage::LocalCredentialStore;
pub use ucloud::UcloudClient;
