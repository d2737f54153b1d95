mod plan;
mod progress;
mod state;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionPlan, SessionPlanBuilder};
pub use progress::SessionProgress;
pub use state::{AnswerLedger, SessionState};
pub use workflow::SessionFlowService;
