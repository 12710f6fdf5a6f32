use crate::backend::BackendError;
use crate::error::ApiError;
use crate::gateway::VerifyError;
use crate::validation::ValidationError;

use super::state::{ConsoleSection, WorkflowStep};

/// Why a workflow operation did not move the workflow. The step is unchanged
/// in every case.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("another request is already in progress")]
    Busy,

    #[error("no customer selected")]
    MissingContext,

    #[error("cannot {action} from the {from} step")]
    InvalidTransition {
        from: WorkflowStep,
        action: &'static str,
    },

    #[error("the workflow is not active while {0} is open")]
    Inactive(ConsoleSection),

    /// The operator moved on before the call finished; its result was dropped.
    #[error("the workflow moved on before the response arrived")]
    Stale,
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(e) => Self::BadRequest(e.to_string()),
            WorkflowError::Verify(e) => e.into(),
            WorkflowError::Backend(e) => e.into(),
            WorkflowError::Busy
            | WorkflowError::MissingContext
            | WorkflowError::InvalidTransition { .. }
            | WorkflowError::Inactive(_)
            | WorkflowError::Stale => Self::Conflict(err.to_string()),
        }
    }
}
