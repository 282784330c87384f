pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{FileOperationLog, LocalCredentialStore, UcloudClient};
pub use config::AppConfig;
pub use core::{control::RunControl, gate::MutationGate, propagation::PropagationPolicy};
pub use core::rotation::RotationEngine;
pub use domain::model::{Phase, PhaseOutcome, RotationReport, RotationRequest, RunState};
pub use utils::error::{Result, RotateError};
