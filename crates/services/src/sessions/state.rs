use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use mcq_core::model::{
    AnswerOption, AttemptAnswer, AttemptError, AttemptId, AttemptSummary, CategoryId, Mode,
    OptionKey, QuestionId, SessionConfig, SessionItem, SetId,
};

use super::plan::SessionPlan;
use super::progress::SessionProgress;

//
// ─── ANSWER LEDGER ─────────────────────────────────────────────────────────────
//

/// Per-question answer records for an in-progress session.
///
/// Practice mode overwrites; exam mode is write-once per question id.
/// Insertion order is irrelevant: the final order is re-derived from the
/// session sequence at finalize time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    entries: HashMap<QuestionId, AttemptAnswer>,
}

impl AnswerLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a practice answer, replacing any earlier one.
    pub fn record_practice(&mut self, answer: AttemptAnswer) {
        self.entries.insert(answer.question_id.clone(), answer);
    }

    /// Records an exam answer once; repeated calls for the same question id
    /// are no-ops and the first-saved answer stands.
    pub fn record_exam(&mut self, answer: AttemptAnswer) {
        self.entries.entry(answer.question_id.clone()).or_insert(answer);
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<&AttemptAnswer> {
        self.entries.get(question_id)
    }

    #[must_use]
    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.entries.contains_key(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//
// ─── SESSION STATE ─────────────────────────────────────────────────────────────
//

/// Complete state of one quiz session as an explicit value object.
///
/// Every transition consumes the state and returns the next one; nothing here
/// touches ambient state, a clock, or storage. Invalid actions (submitting
/// with no selection, saving over an existing exam answer, selecting on a
/// locked item) return the state unchanged rather than failing: the UI is
/// expected to disable those controls, but the engine stays idempotent
/// regardless.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    category_id: CategoryId,
    set_id: SetId,
    plan: SessionPlan,
    config: SessionConfig,
    started_at: DateTime<Utc>,
    index: usize,
    selection: Option<OptionKey>,
    revealed: bool,
    ledger: AnswerLedger,
    flags: HashMap<QuestionId, bool>,
}

impl SessionState {
    /// Starts a session over a built plan.
    ///
    /// A plan with zero items is a valid start; callers detect it through
    /// `progress().total == 0` and render the empty state.
    #[must_use]
    pub fn start(
        category_id: CategoryId,
        set_id: SetId,
        plan: SessionPlan,
        config: SessionConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category_id,
            set_id,
            plan,
            config,
            started_at,
            index: 0,
            selection: None,
            revealed: false,
            ledger: AnswerLedger::new(),
            flags: HashMap::new(),
        }
    }

    #[must_use]
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    #[must_use]
    pub fn set_id(&self) -> &SetId {
        &self.set_id
    }

    #[must_use]
    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 0-based index of the current question, bounded to the plan.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&SessionItem> {
        self.plan.item(self.index)
    }

    /// Option order for the current question under this session's seed.
    #[must_use]
    pub fn current_options(&self) -> Vec<AnswerOption> {
        self.current_item()
            .map(|item| self.plan.options_for(&item.question))
            .unwrap_or_default()
    }

    /// The in-progress selection, cleared on navigation.
    #[must_use]
    pub fn selection(&self) -> Option<&OptionKey> {
        self.selection.as_ref()
    }

    /// True while practice feedback for the current item is visible.
    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    #[must_use]
    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    /// True when the current item no longer accepts selection changes.
    ///
    /// Practice items lock only while their feedback is revealed; navigating
    /// away resets the reveal, so revisiting re-opens the question and a
    /// fresh submit overwrites the earlier ledger entry. Exam items lock
    /// permanently once a saved answer exists. Locking never blocks
    /// navigation.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        match self.config.mode() {
            Mode::Practice => self.revealed,
            Mode::Exam => self
                .current_item()
                .is_some_and(|item| self.ledger.contains(item.question_id())),
        }
    }

    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.current_item()
            .is_some_and(|item| self.flags.get(item.question_id()).copied().unwrap_or(false))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.plan.total();
        let answered = self.ledger.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            flagged: self.flags.values().filter(|on| **on).count(),
        }
    }

    /// Elapsed wall time for the advisory timer display. Never affects
    /// scoring or session correctness.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now - self.started_at
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Sets the in-progress selection; no-op when the item is locked.
    #[must_use]
    pub fn select(mut self, key: OptionKey) -> Self {
        if self.current_item().is_none() || self.is_locked() {
            return self;
        }
        self.selection = Some(key);
        self
    }

    /// Flips the flag for the current question. Independent of answer state;
    /// flags persist across navigation.
    #[must_use]
    pub fn toggle_flag(mut self) -> Self {
        let Some(question_id) = self.current_item().map(|item| item.question_id().clone())
        else {
            return self;
        };
        let flag = self.flags.entry(question_id).or_insert(false);
        *flag = !*flag;
        self
    }

    /// Practice mode: grade the current selection, write (or overwrite) the
    /// ledger entry, and reveal feedback. No-op in exam mode or without a
    /// selection.
    #[must_use]
    pub fn submit(mut self) -> Self {
        if self.config.mode() != Mode::Practice {
            return self;
        }
        let Some(answer) = self.current_answer() else {
            return self;
        };
        self.ledger.record_practice(answer);
        self.revealed = true;
        self
    }

    /// Exam mode: save the current selection without revealing correctness.
    /// Write-once per question; repeated saves and saves without a selection
    /// are no-ops.
    #[must_use]
    pub fn save(mut self) -> Self {
        if self.config.mode() != Mode::Exam || self.is_locked() {
            return self;
        }
        let Some(answer) = self.current_answer() else {
            return self;
        };
        self.ledger.record_exam(answer);
        self
    }

    /// Advances to the next question, clamped to the last one. Clears the
    /// in-progress selection and reveal state; ledger entries are retained.
    #[must_use]
    pub fn go_next(mut self) -> Self {
        let last = self.plan.total().saturating_sub(1);
        self.index = (self.index + 1).min(last);
        self.selection = None;
        self.revealed = false;
        self
    }

    /// Moves back one question, clamped to the first one. Clears the
    /// in-progress selection and reveal state.
    #[must_use]
    pub fn go_prev(mut self) -> Self {
        self.index = self.index.saturating_sub(1);
        self.selection = None;
        self.revealed = false;
        self
    }

    fn current_answer(&self) -> Option<AttemptAnswer> {
        let item = self.current_item()?;
        let selected = self.selection.clone()?;
        let flagged = self
            .flags
            .get(item.question_id())
            .copied()
            .unwrap_or(false);
        Some(AttemptAnswer::answered(
            item.question_id().clone(),
            item.subcategory_id.clone(),
            selected,
            item.question.correct_key().clone(),
            flagged,
        ))
    }

    //
    // ─── FINALIZE ──────────────────────────────────────────────────────────────
    //

    /// Freezes the session into an immutable attempt record.
    ///
    /// Emits one answer per session item, in session order, so the results
    /// review lines up with what the user saw. Items without a ledger entry
    /// are synthesized as unanswered (`selected_key = None`, never correct),
    /// carrying their flag state.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `finished_at` precedes
    /// the session start.
    pub fn finalize(
        &self,
        attempt_id: AttemptId,
        finished_at: DateTime<Utc>,
    ) -> Result<AttemptSummary, AttemptError> {
        let answers: Vec<AttemptAnswer> = self
            .plan
            .items()
            .iter()
            .map(|item| {
                self.ledger.get(item.question_id()).cloned().unwrap_or_else(|| {
                    AttemptAnswer::unanswered(
                        item.question_id().clone(),
                        item.subcategory_id.clone(),
                        item.question.correct_key().clone(),
                        self.flags.get(item.question_id()).copied().unwrap_or(false),
                    )
                })
            })
            .collect();

        AttemptSummary::new(
            attempt_id,
            self.category_id.clone(),
            self.set_id.clone(),
            &self.config,
            self.started_at,
            finished_at,
            answers,
        )
    }
}
