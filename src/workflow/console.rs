use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::backend::SupportBackend;
use crate::customer::UserType;
use crate::gateway::{self, VerificationMethod};
use crate::requests::{RequestForm, RequestStatus, RequestType, SupportRequest};
use crate::validation;

use super::controller::{PendingCall, WorkflowController};
use super::error::WorkflowError;
use super::state::{ConsoleSection, Transition, WorkflowSnapshot, WorkflowStep};

const SUBMIT_STEPS: &[WorkflowStep] = &[WorkflowStep::CreateRequest, WorkflowStep::ModifyMobile];

/// Result of flipping a request's status, with the refreshed list.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub reference_id: String,
    pub status: RequestStatus,
    pub requests: Vec<SupportRequest>,
}

/// One operator session: the workflow controller plus the backend it talks
/// to.
///
/// The controller lock is never held across a network call. Calls that
/// change the step go through `begin`/`finish` so a result arriving after the
/// operator left the step is dropped instead of applied.
pub struct Console<B> {
    controller: Arc<Mutex<WorkflowController>>,
    backend: Arc<B>,
}

impl<B> Clone for Console<B> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: SupportBackend> Console<B> {
    pub fn new(backend: B) -> Self {
        Self {
            controller: Arc::new(Mutex::new(WorkflowController::new())),
            backend: Arc::new(backend),
        }
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.controller.lock().await.snapshot()
    }

    /// Apply a local transition that needs no network call.
    pub async fn dispatch(&self, transition: Transition) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut ctl = self.controller.lock().await;
        ctl.dispatch(transition)?;
        Ok(ctl.snapshot())
    }

    pub async fn start_create(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::StartCreate).await
    }

    pub async fn start_modify_mobile(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::StartModifyMobile).await
    }

    pub async fn return_to_overview(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::ReturnToOverview).await
    }

    pub async fn reset(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::Reset).await
    }

    pub async fn tab_switch(&self, section: ConsoleSection) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::TabSwitch(section)).await
    }

    pub async fn navigate(&self, step: WorkflowStep) -> Result<WorkflowSnapshot, WorkflowError> {
        self.dispatch(Transition::Navigate(step)).await
    }

    /// Look up a customer and, on success, move to the overview.
    pub async fn verify(
        &self,
        user_type: UserType,
        method: VerificationMethod,
        identifier: &str,
    ) -> Result<WorkflowSnapshot, WorkflowError> {
        let call = self
            .controller
            .lock()
            .await
            .begin(&[WorkflowStep::Verify], "verify")?;

        let result = gateway::verify(self.backend.as_ref(), user_type, method, identifier).await;

        let mut ctl = self.controller.lock().await;
        if !ctl.finish(call) {
            return Err(WorkflowError::Stale);
        }
        match result {
            Ok(customer) => {
                ctl.dispatch(Transition::Verified(customer))?;
                Ok(ctl.snapshot())
            }
            Err(err) => {
                ctl.reject(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate the form and file it for the active customer.
    ///
    /// On the legacy mobile-change step the request type is always
    /// `modify-mobile-number`, whatever the form says.
    #[tracing::instrument(skip(self, form), err)]
    pub async fn submit(&self, form: RequestForm) -> Result<WorkflowSnapshot, WorkflowError> {
        let (call, customer_id, request) = {
            let mut ctl = self.controller.lock().await;
            ctl.ensure_ready(SUBMIT_STEPS, "submit")?;
            let customer_id = ctl
                .customer()
                .map(|c| c.id.clone())
                .ok_or(WorkflowError::MissingContext)?;

            let checked = validation::check_customer_id(&customer_id).and_then(|()| {
                if ctl.step() == WorkflowStep::ModifyMobile {
                    validation::validate(RequestType::ModifyMobileNumber, &form)
                } else {
                    validation::validate_form(&form)
                }
            });
            let request = match checked {
                Ok(request) => request,
                Err(err) => {
                    ctl.reject(err.to_string());
                    return Err(err.into());
                }
            };
            (ctl.begin(SUBMIT_STEPS, "submit")?, customer_id, request)
        };

        let result = self.backend.create_request(&customer_id, &request).await;

        let mut ctl = self.controller.lock().await;
        if !ctl.finish(call) {
            return Err(WorkflowError::Stale);
        }
        match result {
            Ok(reference_id) => {
                ctl.dispatch(Transition::Submitted { reference_id })?;
                Ok(ctl.snapshot())
            }
            Err(err) => {
                ctl.reject(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Requests filed for the active customer. Does not change the step.
    pub async fn list_requests(&self) -> Result<Vec<SupportRequest>, WorkflowError> {
        let (customer_id, ticket) = self.active_customer().await?;
        let requests = self.backend.list_requests(&customer_id).await?;
        self.ensure_current(ticket).await?;
        Ok(requests)
    }

    /// Flip one request's status, then re-read the list from the backend.
    pub async fn toggle_status(&self, reference_id: &str) -> Result<ToggleOutcome, WorkflowError> {
        let (customer_id, ticket) = self.active_customer().await?;
        let status = self
            .backend
            .toggle_status(reference_id, &customer_id)
            .await?;
        self.ensure_current(ticket).await?;
        let requests = self.backend.list_requests(&customer_id).await?;
        self.ensure_current(ticket).await?;
        Ok(ToggleOutcome {
            reference_id: reference_id.to_owned(),
            status,
            requests,
        })
    }

    async fn active_customer(&self) -> Result<(String, PendingCall), WorkflowError> {
        let ctl = self.controller.lock().await;
        if ctl.section() != ConsoleSection::CustomerService {
            return Err(WorkflowError::Inactive(ctl.section()));
        }
        let id = ctl
            .customer()
            .map(|c| c.id.clone())
            .ok_or(WorkflowError::MissingContext)?;
        validation::check_customer_id(&id)?;
        Ok((id, ctl.watch()))
    }

    /// Fails with `Stale` once the operator has moved on from the customer
    /// the read was made for.
    async fn ensure_current(&self, ticket: PendingCall) -> Result<(), WorkflowError> {
        if self.controller.lock().await.is_current(ticket) {
            Ok(())
        } else {
            tracing::debug!("discarding request data for a customer the operator left");
            Err(WorkflowError::Stale)
        }
    }
}
