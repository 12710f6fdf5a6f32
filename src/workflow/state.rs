use std::fmt;

use serde::{Deserialize, Serialize};

use crate::customer::CustomerRecord;

/// One screen of the operator flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    Verify,
    Overview,
    CreateRequest,
    /// Legacy single-purpose form that only files mobile-number changes.
    ModifyMobile,
    Confirmation,
}

impl WorkflowStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Overview => "overview",
            Self::CreateRequest => "create-request",
            Self::ModifyMobile => "modify-mobile",
            Self::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level console sections. The workflow only lives in `CustomerService`;
/// leaving it discards the active customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleSection {
    Dashboard,
    Organisers,
    #[default]
    CustomerService,
}

impl ConsoleSection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Organisers => "organisers",
            Self::CustomerService => "customer-service",
        }
    }
}

impl fmt::Display for ConsoleSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The active step together with the context it needs. A step cannot be
/// represented without its context.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    #[default]
    Verify,
    Overview {
        customer: CustomerRecord,
    },
    CreateRequest {
        customer: CustomerRecord,
    },
    ModifyMobile {
        customer: CustomerRecord,
    },
    Confirmation {
        reference_id: String,
        customer: CustomerRecord,
    },
}

impl WorkflowState {
    pub fn step(&self) -> WorkflowStep {
        match self {
            Self::Verify => WorkflowStep::Verify,
            Self::Overview { .. } => WorkflowStep::Overview,
            Self::CreateRequest { .. } => WorkflowStep::CreateRequest,
            Self::ModifyMobile { .. } => WorkflowStep::ModifyMobile,
            Self::Confirmation { .. } => WorkflowStep::Confirmation,
        }
    }

    pub fn customer(&self) -> Option<&CustomerRecord> {
        match self {
            Self::Verify => None,
            Self::Overview { customer }
            | Self::CreateRequest { customer }
            | Self::ModifyMobile { customer }
            | Self::Confirmation { customer, .. } => Some(customer),
        }
    }

    pub fn reference_id(&self) -> Option<&str> {
        match self {
            Self::Confirmation { reference_id, .. } => Some(reference_id),
            _ => None,
        }
    }
}

/// Events that move the workflow. Each carries the context the next step
/// needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Verified(CustomerRecord),
    StartCreate,
    StartModifyMobile,
    Submitted { reference_id: String },
    ReturnToOverview,
    Reset,
    TabSwitch(ConsoleSection),
    /// Direct entry to a step, e.g. from a reloaded route. Falls back to
    /// `Verify` when the current context cannot support the step.
    Navigate(WorkflowStep),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verified(_) => "verify",
            Self::StartCreate => "start a request",
            Self::StartModifyMobile => "start a mobile change",
            Self::Submitted { .. } => "submit",
            Self::ReturnToOverview => "return to overview",
            Self::Reset => "reset",
            Self::TabSwitch(_) => "switch section",
            Self::Navigate(_) => "navigate",
        }
    }
}

/// What the frontend renders.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub step: WorkflowStep,
    pub section: ConsoleSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub busy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
