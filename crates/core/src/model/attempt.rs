use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{AttemptId, CategoryId, OptionKey, QuestionId, SetId, SubcategoryId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("finished_at is before started_at")]
    InvalidTimeRange,
}

/// Session mode. Practice reveals correctness per question; exam defers all
/// feedback to the results view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Practice,
    Exam,
}

//
// ─── SESSION CONFIG ────────────────────────────────────────────────────────────
//

/// Configuration captured at session start.
///
/// A `Some` wrong-only filter marks the session as a follow-up run; an empty
/// filter set retains every question, same as no filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    mode: Mode,
    shuffle_questions: bool,
    shuffle_options: bool,
    timer_enabled: bool,
    wrong_only_filter: Option<HashSet<QuestionId>>,
}

impl SessionConfig {
    /// Creates the default configuration for a mode: both shuffles on,
    /// timer off, no filter.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            shuffle_questions: true,
            shuffle_options: true,
            timer_enabled: false,
            wrong_only_filter: None,
        }
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, on: bool) -> Self {
        self.shuffle_questions = on;
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, on: bool) -> Self {
        self.shuffle_options = on;
        self
    }

    #[must_use]
    pub fn with_timer(mut self, on: bool) -> Self {
        self.timer_enabled = on;
        self
    }

    #[must_use]
    pub fn with_wrong_only_filter(mut self, wrong_ids: HashSet<QuestionId>) -> Self {
        self.wrong_only_filter = Some(wrong_ids);
        self
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    #[must_use]
    pub fn wrong_only(&self) -> bool {
        self.wrong_only_filter.is_some()
    }

    #[must_use]
    pub fn wrong_only_filter(&self) -> Option<&HashSet<QuestionId>> {
        self.wrong_only_filter.as_ref()
    }
}

//
// ─── ATTEMPT RECORDS ───────────────────────────────────────────────────────────
//

/// One recorded answer within an attempt, keyed by question id.
///
/// `correct_key` is a denormalized copy fixed at answer time so the record
/// stays self-contained after the bank changes. `selected_key = None` means
/// the question was never answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptAnswer {
    pub question_id: QuestionId,
    pub subcategory_id: SubcategoryId,
    pub selected_key: Option<OptionKey>,
    pub correct_key: OptionKey,
    pub is_correct: bool,
    pub flagged: bool,
}

impl AttemptAnswer {
    /// Records an answered question, deriving correctness from the keys.
    #[must_use]
    pub fn answered(
        question_id: QuestionId,
        subcategory_id: SubcategoryId,
        selected_key: OptionKey,
        correct_key: OptionKey,
        flagged: bool,
    ) -> Self {
        let is_correct = selected_key == correct_key;
        Self {
            question_id,
            subcategory_id,
            selected_key: Some(selected_key),
            correct_key,
            is_correct,
            flagged,
        }
    }

    /// Synthesizes the record for a question the user never answered.
    #[must_use]
    pub fn unanswered(
        question_id: QuestionId,
        subcategory_id: SubcategoryId,
        correct_key: OptionKey,
        flagged: bool,
    ) -> Self {
        Self {
            question_id,
            subcategory_id,
            selected_key: None,
            correct_key,
            is_correct: false,
            flagged,
        }
    }
}

/// A finalized attempt. Immutable once created; only ever appended to history.
///
/// `answers` holds one entry per session item, in session order, so the
/// results review table lines up positionally with the session the user saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    attempt_id: AttemptId,
    category_id: CategoryId,
    set_id: SetId,
    mode: Mode,
    shuffle_questions: bool,
    shuffle_options: bool,
    timer_enabled: bool,
    wrong_only: bool,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    answers: Vec<AttemptAnswer>,
}

impl AttemptSummary {
    /// Builds a finalized attempt record.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `finished_at` is before
    /// `started_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        attempt_id: AttemptId,
        category_id: CategoryId,
        set_id: SetId,
        config: &SessionConfig,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        answers: Vec<AttemptAnswer>,
    ) -> Result<Self, AttemptError> {
        if finished_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }

        Ok(Self {
            attempt_id,
            category_id,
            set_id,
            mode: config.mode(),
            shuffle_questions: config.shuffle_questions(),
            shuffle_options: config.shuffle_options(),
            timer_enabled: config.timer_enabled(),
            wrong_only: config.wrong_only(),
            started_at,
            finished_at,
            answers,
        })
    }

    #[must_use]
    pub fn attempt_id(&self) -> &AttemptId {
        &self.attempt_id
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
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    #[must_use]
    pub fn wrong_only(&self) -> bool {
        self.wrong_only
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    #[must_use]
    pub fn answers(&self) -> &[AttemptAnswer] {
        &self.answers
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.finished_at - self.started_at
    }
}
