use crate::customer::CustomerRecord;

use super::error::WorkflowError;
use super::state::{ConsoleSection, Transition, WorkflowSnapshot, WorkflowState, WorkflowStep};

/// State machine for one operator session.
///
/// Holds exactly one [`WorkflowState`] and replaces it whole on every valid
/// transition. Remote calls are bracketed by [`begin`](Self::begin) and
/// [`finish`](Self::finish): the busy flag blocks a second call, and the epoch
/// lets a late result be recognised and dropped.
#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    section: ConsoleSection,
    busy: bool,
    epoch: u64,
    last_error: Option<String>,
}

/// Ticket for an in-flight remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct PendingCall {
    epoch: u64,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> WorkflowStep {
        self.state.step()
    }

    pub fn section(&self) -> ConsoleSection {
        self.section
    }

    pub fn customer(&self) -> Option<&CustomerRecord> {
        self.state.customer()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            step: self.step(),
            section: self.section,
            customer: self.customer().cloned(),
            reference_id: self.state.reference_id().map(str::to_owned),
            busy: self.busy,
            error: self.last_error.clone(),
        }
    }

    /// Apply a transition. On error nothing changes.
    pub fn dispatch(&mut self, transition: Transition) -> Result<WorkflowStep, WorkflowError> {
        if let Transition::TabSwitch(section) = transition {
            return Ok(self.switch_section(section));
        }
        self.ensure_active()?;

        let from = self.step();
        let next = self.next_state(transition)?;
        // Staying put keeps any in-flight call and its busy flag.
        if next == self.state {
            return Ok(from);
        }
        if self.busy && next.step() == from {
            return Err(WorkflowError::Busy);
        }
        self.replace(next);
        tracing::info!(%from, to = %self.step(), "workflow transition");
        Ok(self.step())
    }

    /// Check that a remote call may start from the current step.
    pub fn ensure_ready(
        &self,
        allowed: &[WorkflowStep],
        action: &'static str,
    ) -> Result<(), WorkflowError> {
        self.ensure_active()?;
        let from = self.step();
        if !allowed.contains(&from) {
            return Err(WorkflowError::InvalidTransition { from, action });
        }
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        Ok(())
    }

    /// Mark a remote call as in flight.
    pub fn begin(
        &mut self,
        allowed: &[WorkflowStep],
        action: &'static str,
    ) -> Result<PendingCall, WorkflowError> {
        self.ensure_ready(allowed, action)?;
        self.busy = true;
        self.last_error = None;
        Ok(PendingCall { epoch: self.epoch })
    }

    /// Close a call opened by [`begin`](Self::begin). Returns `false` when the
    /// workflow moved on meanwhile; the caller must then drop the result.
    pub fn finish(&mut self, call: PendingCall) -> bool {
        if call.epoch != self.epoch {
            tracing::debug!(
                call_epoch = call.epoch,
                epoch = self.epoch,
                "discarding result for a step the operator left"
            );
            return false;
        }
        self.busy = false;
        true
    }

    /// Ticket for a read that does not block other calls. Check it with
    /// [`is_current`](Self::is_current) before using the result.
    pub fn watch(&self) -> PendingCall {
        PendingCall { epoch: self.epoch }
    }

    pub fn is_current(&self, call: PendingCall) -> bool {
        call.epoch == self.epoch
    }

    /// Record a rejection reason for display. The step does not change.
    pub fn reject(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(step = %self.step(), %reason, "workflow action rejected");
        self.last_error = Some(reason);
    }

    fn ensure_active(&self) -> Result<(), WorkflowError> {
        if self.section == ConsoleSection::CustomerService {
            Ok(())
        } else {
            Err(WorkflowError::Inactive(self.section))
        }
    }

    fn replace(&mut self, next: WorkflowState) {
        self.state = next;
        self.epoch += 1;
        self.busy = false;
        self.last_error = None;
    }

    /// Leaving the section resets the workflow and forgets the customer.
    fn switch_section(&mut self, section: ConsoleSection) -> WorkflowStep {
        if section == self.section {
            return self.step();
        }
        let from = self.section;
        self.section = section;
        self.replace(WorkflowState::Verify);
        tracing::info!(%from, to = %section, "console section switched, workflow reset");
        self.step()
    }

    fn require_customer(&self) -> Result<CustomerRecord, WorkflowError> {
        self.customer().cloned().ok_or(WorkflowError::MissingContext)
    }

    fn next_state(&self, transition: Transition) -> Result<WorkflowState, WorkflowError> {
        use WorkflowStep as S;

        let from = self.step();
        match (from, transition) {
            (S::Verify, Transition::Verified(customer)) => Ok(WorkflowState::Overview { customer }),
            (S::Overview, Transition::StartCreate) => Ok(WorkflowState::CreateRequest {
                customer: self.require_customer()?,
            }),
            (S::Overview, Transition::StartModifyMobile) => Ok(WorkflowState::ModifyMobile {
                customer: self.require_customer()?,
            }),
            (S::CreateRequest | S::ModifyMobile, Transition::Submitted { reference_id }) => {
                Ok(WorkflowState::Confirmation {
                    reference_id,
                    customer: self.require_customer()?,
                })
            }
            (
                S::Overview | S::CreateRequest | S::ModifyMobile | S::Confirmation,
                Transition::ReturnToOverview,
            ) => Ok(WorkflowState::Overview {
                customer: self.require_customer()?,
            }),
            (_, Transition::Reset) => Ok(WorkflowState::Verify),
            (_, Transition::Navigate(step)) => Ok(self.navigate_target(step)),
            (from, transition) => Err(WorkflowError::InvalidTransition {
                from,
                action: transition.name(),
            }),
        }
    }

    /// Enter `step` directly if the current context supports it, otherwise
    /// fall back to the initial step.
    fn navigate_target(&self, step: WorkflowStep) -> WorkflowState {
        let target = match (step, self.customer()) {
            (WorkflowStep::Confirmation, _) if self.step() == WorkflowStep::Confirmation => {
                Some(self.state.clone())
            }
            (WorkflowStep::Overview, Some(customer)) => Some(WorkflowState::Overview {
                customer: customer.clone(),
            }),
            (WorkflowStep::CreateRequest, Some(customer)) => Some(WorkflowState::CreateRequest {
                customer: customer.clone(),
            }),
            (WorkflowStep::ModifyMobile, Some(customer)) => Some(WorkflowState::ModifyMobile {
                customer: customer.clone(),
            }),
            _ => None,
        };
        target.unwrap_or_else(|| {
            if step != WorkflowStep::Verify {
                tracing::warn!(%step, "required context missing, falling back to verify");
            }
            WorkflowState::Verify
        })
    }
}
