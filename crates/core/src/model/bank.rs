use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{CategoryId, OptionKey, QuestionId, SetId, SubcategoryId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("question stem cannot be empty")]
    EmptyStem,

    #[error("question must have at least one option")]
    NoOptions,

    #[error("duplicate option key: {0}")]
    DuplicateOptionKey(OptionKey),

    #[error("correct key {0} does not match any option")]
    UnknownCorrectKey(OptionKey),
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// One selectable answer option. Option order within a question carries no
/// meaning; presentation order is decided per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    key: OptionKey,
    text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(key: impl Into<OptionKey>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &OptionKey {
        &self.key
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A multiple-choice question. Immutable once loaded from the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    stem: String,
    options: Vec<AnswerOption>,
    correct_key: OptionKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation_short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation_long: Option<String>,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `BankError` if the stem is empty, option keys collide, or
    /// `correct_key` matches no option.
    pub fn new(
        id: QuestionId,
        stem: impl Into<String>,
        options: Vec<AnswerOption>,
        correct_key: OptionKey,
        explanation_short: Option<String>,
        explanation_long: Option<String>,
    ) -> Result<Self, BankError> {
        let stem = stem.into();
        if stem.trim().is_empty() {
            return Err(BankError::EmptyStem);
        }
        if options.is_empty() {
            return Err(BankError::NoOptions);
        }
        let mut seen = HashSet::new();
        for option in &options {
            if !seen.insert(option.key().clone()) {
                return Err(BankError::DuplicateOptionKey(option.key().clone()));
            }
        }
        if !seen.contains(&correct_key) {
            return Err(BankError::UnknownCorrectKey(correct_key));
        }

        Ok(Self {
            id,
            stem,
            options,
            correct_key,
            explanation_short,
            explanation_long,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_key(&self) -> &OptionKey {
        &self.correct_key
    }

    #[must_use]
    pub fn explanation_short(&self) -> Option<&str> {
        self.explanation_short.as_deref()
    }

    #[must_use]
    pub fn explanation_long(&self) -> Option<&str> {
        self.explanation_long.as_deref()
    }
}

//
// ─── BANK NESTING ──────────────────────────────────────────────────────────────
//

/// A titled group of questions, owned by exactly one `QuestionSet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    id: SubcategoryId,
    title: String,
    questions: Vec<Question>,
}

impl Subcategory {
    #[must_use]
    pub fn new(id: SubcategoryId, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id,
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubcategoryId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// A question set, owned by exactly one `Category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    id: SetId,
    title: String,
    subcategories: Vec<Subcategory>,
}

impl QuestionSet {
    #[must_use]
    pub fn new(id: SetId, title: impl Into<String>, subcategories: Vec<Subcategory>) -> Self {
        Self {
            id,
            title: title.into(),
            subcategories,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SetId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    /// Flattens the set into session items, preserving source order.
    #[must_use]
    pub fn flatten(&self) -> Vec<SessionItem> {
        let mut flat = Vec::new();
        for sub in &self.subcategories {
            for question in sub.questions() {
                flat.push(SessionItem {
                    question: question.clone(),
                    subcategory_id: sub.id().clone(),
                    subcategory_title: sub.title().to_owned(),
                });
            }
        }
        flat
    }

    /// Resolves a subcategory title, falling back to the raw id when unknown.
    #[must_use]
    pub fn subcategory_title(&self, id: &SubcategoryId) -> String {
        self.subcategories
            .iter()
            .find(|sub| sub.id() == id)
            .map_or_else(|| id.to_string(), |sub| sub.title().to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    title: String,
    sets: Vec<QuestionSet>,
}

impl Category {
    #[must_use]
    pub fn new(id: CategoryId, title: impl Into<String>, sets: Vec<QuestionSet>) -> Self {
        Self {
            id,
            title: title.into(),
            sets,
        }
    }

    #[must_use]
    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn sets(&self) -> &[QuestionSet] {
        &self.sets
    }

    #[must_use]
    pub fn set(&self, id: &SetId) -> Option<&QuestionSet> {
        self.sets.iter().find(|set| set.id() == id)
    }
}

/// Root of the static question bank. Loaded once, never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    categories: Vec<Category>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|cat| cat.id() == id)
    }

    /// Looks up a set through its owning category.
    #[must_use]
    pub fn find_set(&self, category_id: &CategoryId, set_id: &SetId) -> Option<&QuestionSet> {
        self.category(category_id).and_then(|cat| cat.set(set_id))
    }
}

//
// ─── SESSION ITEM ──────────────────────────────────────────────────────────────
//

/// Flattened, session-scoped view of a question: the question plus its owning
/// subcategory, independent of the bank's nesting. Derived per session start,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionItem {
    pub question: Question,
    pub subcategory_id: SubcategoryId,
    pub subcategory_title: String,
}

impl SessionItem {
    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        self.question.id()
    }
}
