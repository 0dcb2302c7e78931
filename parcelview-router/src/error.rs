//! Error types for orchestration

use crate::state::{CycleState, CycleStep};
use thiserror::Error;

/// Errors from the orchestrator and navigator
#[derive(Debug, Error)]
pub enum RouteError {
    /// A cycle tried to take a step its current state does not allow
    #[error("Invalid cycle transition: {step:?} from {from:?}")]
    InvalidTransition { from: CycleState, step: CycleStep },

    /// Route parsing or model error
    #[error(transparent)]
    Core(#[from] parcelview_core::CoreError),

    /// Resolver construction error
    #[error(transparent)]
    Resolve(#[from] parcelview_resolve::ResolveError),
}

pub type Result<T> = std::result::Result<T, RouteError>;
