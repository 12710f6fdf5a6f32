pub mod console;
pub mod controller;
pub mod error;
pub mod state;

pub use console::{Console, ToggleOutcome};
pub use controller::{PendingCall, WorkflowController};
pub use error::WorkflowError;
pub use state::{ConsoleSection, Transition, WorkflowSnapshot, WorkflowState, WorkflowStep};
