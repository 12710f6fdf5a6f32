use crate::error::ApiError;

/// Failure talking to the support service.
///
/// Each variant renders the message an operator sees; diagnostic detail stays
/// in the fields and goes to the log.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("cannot reach the support service")]
    Connectivity(#[source] reqwest::Error),

    #[error("the support service did not respond in time")]
    Timeout,

    #[error("{0}")]
    NotFound(String),

    #[error("support service error")]
    Server { status: u16, detail: String },

    /// The service answered but refused the operation (non-success status or
    /// `success: false`).
    #[error("{0}")]
    Rejected(String),

    /// Response was not the structured format the call expects. Carries an
    /// excerpt of the raw body for diagnosis.
    #[error("unexpected response from the support service")]
    Protocol { content_type: String, excerpt: String },

    #[error("malformed response from the support service: {0}")]
    Malformed(String),

    #[error("no customer selected")]
    MissingCustomerId,
}

impl BackendError {
    /// Transport-level failures the operator may retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connectivity(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Connectivity(err)
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(msg) => Self::NotFound(msg),
            BackendError::Rejected(msg) => Self::Unprocessable(msg),
            BackendError::MissingCustomerId => Self::BadRequest(err.to_string()),
            BackendError::Timeout => Self::GatewayTimeout(err.to_string()),
            BackendError::Protocol {
                ref content_type,
                ref excerpt,
            } => {
                tracing::error!(
                    %content_type,
                    %excerpt,
                    "support service returned an unstructured response"
                );
                Self::BadGateway(err.to_string())
            }
            BackendError::Server { status, ref detail } => {
                tracing::warn!(status, %detail, "support service error");
                Self::BadGateway(err.to_string())
            }
            BackendError::Connectivity(_) | BackendError::Malformed(_) => {
                tracing::warn!(error = %err, "support service call failed");
                Self::BadGateway(err.to_string())
            }
        }
    }
}
