pub mod client;
pub mod error;
pub mod wire;

use std::future::Future;

use crate::customer::CustomerRecord;
use crate::gateway::VerifyQuery;
use crate::requests::{NewRequest, RequestStatus, SupportRequest};

pub use client::HttpSupportClient;
pub use error::BackendError;

// ---------------------------------------------------------------------------
// SupportBackend trait
// ---------------------------------------------------------------------------

/// Remote store the workflow reads customers and requests from.
///
/// Implementations make exactly one attempt per call and keep no state
/// between calls. Futures are `Send` so callers can drive them from request
/// handlers.
pub trait SupportBackend: Send + Sync {
    /// Resolve an identifier to a customer record.
    fn verify_user(
        &self,
        query: &VerifyQuery,
    ) -> impl Future<Output = Result<CustomerRecord, BackendError>> + Send;

    /// File a request; returns the server-assigned reference id.
    fn create_request(
        &self,
        customer_id: &str,
        request: &NewRequest,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn list_requests(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<Vec<SupportRequest>, BackendError>> + Send;

    /// Flip a request between open and closed; returns the new status.
    fn toggle_status(
        &self,
        reference_id: &str,
        customer_id: &str,
    ) -> impl Future<Output = Result<RequestStatus, BackendError>> + Send;
}
