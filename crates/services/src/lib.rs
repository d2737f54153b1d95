#![forbid(unsafe_code)]

pub mod analysis;
pub mod bank;
pub mod error;
pub mod sessions;

pub use mcq_core::Clock;

pub use analysis::{AttemptAnalysis, SubcategoryStats};
pub use bank::BankService;
pub use error::{BankLoadError, SessionError};

pub use sessions::{
    AnswerLedger, SessionFlowService, SessionPlan, SessionPlanBuilder, SessionProgress,
    SessionState,
};
