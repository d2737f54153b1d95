use mcq_core::model::{AnswerOption, Question, QuestionSet, SessionConfig, SessionItem};
use mcq_core::{question_seed, shuffle};

/// Ordered, indexable question sequence for one session.
///
/// Built once at session start; `total` is fixed for the session's lifetime.
/// A plan with zero items is a valid terminal state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    items: Vec<SessionItem>,
    seed: i64,
    shuffle_options: bool,
}

impl SessionPlan {
    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[SessionItem] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&SessionItem> {
        self.items.get(index)
    }

    #[must_use]
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Presentation order of a question's options for this session.
    ///
    /// Stable across re-renders of the same question within the session, but
    /// varies per question: the option seed mixes the session seed with a
    /// checksum of the question id.
    #[must_use]
    pub fn options_for(&self, question: &Question) -> Vec<AnswerOption> {
        if !self.shuffle_options {
            return question.options().to_vec();
        }
        shuffle(question.options(), question_seed(self.seed, question.id()))
    }
}

/// Builds the session sequence from a question set and configuration.
///
/// Steps: flatten subcategories in source order, apply the wrong-only filter
/// when one is present and non-empty, then permute with the session seed when
/// question shuffling is on.
pub struct SessionPlanBuilder<'a> {
    set: &'a QuestionSet,
}

impl<'a> SessionPlanBuilder<'a> {
    #[must_use]
    pub fn new(set: &'a QuestionSet) -> Self {
        Self { set }
    }

    #[must_use]
    pub fn build(self, config: &SessionConfig, seed: i64) -> SessionPlan {
        let mut items = self.set.flatten();

        if let Some(filter) = config.wrong_only_filter() {
            // Filter ids missing from the set silently yield fewer items.
            if !filter.is_empty() {
                items.retain(|item| filter.contains(item.question_id()));
            }
        }

        if config.shuffle_questions() {
            items = shuffle(&items, seed);
        }

        SessionPlan {
            items,
            seed,
            shuffle_options: config.shuffle_options(),
        }
    }
}
