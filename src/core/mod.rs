pub mod control;
pub mod gate;
pub mod propagation;
pub mod resolution;
pub mod rotation;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{
    DomainSet, HttpsState, Phase, PhaseOutcome, RotationReport, RotationRequest, RunState,
};
pub use crate::domain::ports::{CdnControlPlane, CredentialStore, OperationLog};
pub use crate::utils::error::Result;
