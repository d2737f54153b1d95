use std::sync::Arc;

use mcq_core::Clock;
use mcq_core::model::{AttemptId, AttemptSummary, CategoryId, SessionConfig, SetId};
use storage::repository::{AttemptHistoryRepository, SessionHandoffRepository};

use super::plan::SessionPlanBuilder;
use super::state::SessionState;
use crate::analysis::AttemptAnalysis;
use crate::bank::BankService;
use crate::error::SessionError;

/// Orchestrates session start, finish, and the handoff between views.
///
/// The seed for each session is sampled once from the injected clock at
/// start; the shuffle itself never reads time or randomness.
#[derive(Clone)]
pub struct SessionFlowService {
    clock: Clock,
    bank: Arc<BankService>,
    history: Arc<dyn AttemptHistoryRepository>,
    handoff: Arc<dyn SessionHandoffRepository>,
}

impl SessionFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<BankService>,
        history: Arc<dyn AttemptHistoryRepository>,
        handoff: Arc<dyn SessionHandoffRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            history,
            handoff,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &BankService {
        &self.bank
    }

    /// Starts a session for the given category and set.
    ///
    /// Returns `Ok(None)` when the ids resolve to nothing in the bank — the
    /// caller renders "not found". When `wrong_only` is set, the wrong-id
    /// filter is read from the handoff slot; an absent slot degrades to a
    /// full-set session. A session with zero items is a valid result the
    /// caller detects through `progress().total`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the handoff slot cannot be read.
    pub async fn start_session(
        &self,
        category_id: CategoryId,
        set_id: SetId,
        mut config: SessionConfig,
        wrong_only: bool,
    ) -> Result<Option<SessionState>, SessionError> {
        let Some((_, set)) = self.bank.find_set(&category_id, &set_id) else {
            return Ok(None);
        };

        if wrong_only {
            if let Some(wrong_ids) = self.handoff.wrong_ids().await? {
                config = config.with_wrong_only_filter(wrong_ids);
            }
        }

        let started_at = self.clock.now();
        let seed = started_at.timestamp_millis();
        let plan = SessionPlanBuilder::new(set).build(&config, seed);

        Ok(Some(SessionState::start(
            category_id,
            set_id,
            plan,
            config,
            started_at,
        )))
    }

    /// Finalizes the session and persists the attempt: appended to the
    /// bounded history and stored in the last-attempt handoff slot for the
    /// results view.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` if the finish time precedes the
    /// session start (only possible with a misbehaving clock), or
    /// `SessionError::Storage` on persistence failures.
    pub async fn finish(&self, state: &SessionState) -> Result<AttemptSummary, SessionError> {
        let finished_at = self.clock.now();
        let attempt_id = AttemptId::generate(finished_at);
        let summary = state.finalize(attempt_id, finished_at)?;

        self.history.append(&summary).await?;
        self.handoff.set_last_attempt(&summary).await?;
        Ok(summary)
    }

    /// Loads the most recent finalized attempt together with its analysis.
    ///
    /// Returns `Ok(None)` when no attempt has been finalized this session or
    /// when the attempt's set no longer resolves in the bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the handoff slot cannot be read.
    pub async fn last_attempt_analysis(
        &self,
    ) -> Result<Option<(AttemptSummary, AttemptAnalysis)>, SessionError> {
        let Some(attempt) = self.handoff.last_attempt().await? else {
            return Ok(None);
        };
        let Some((_, set)) = self.bank.find_set(attempt.category_id(), attempt.set_id()) else {
            return Ok(None);
        };
        let analysis = AttemptAnalysis::analyze(&attempt, set);
        Ok(Some((attempt, analysis)))
    }

    /// Queues the analysis' wrong ids for a wrong-only follow-up session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the handoff slot cannot be written.
    pub async fn queue_wrong_only_follow_up(
        &self,
        analysis: &AttemptAnalysis,
    ) -> Result<(), SessionError> {
        self.handoff.set_wrong_ids(&analysis.wrong_id_set()).await?;
        Ok(())
    }

    /// Loads the retained attempt history, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn attempt_history(&self) -> Result<Vec<AttemptSummary>, SessionError> {
        Ok(self.history.load_all().await?)
    }
}
