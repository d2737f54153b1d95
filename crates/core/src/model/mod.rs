mod attempt;
mod bank;
mod ids;

pub use ids::{AttemptId, CategoryId, OptionKey, QuestionId, SetId, SubcategoryId};

pub use attempt::{AttemptAnswer, AttemptError, AttemptSummary, Mode, SessionConfig};
pub use bank::{
    AnswerOption, BankError, Category, Question, QuestionBank, QuestionSet, SessionItem,
    Subcategory,
};
