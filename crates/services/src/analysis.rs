use chrono::Duration;
use std::collections::{HashMap, HashSet};

use mcq_core::model::{AttemptSummary, QuestionId, QuestionSet, SubcategoryId};

/// Score breakdown for one subcategory of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubcategoryStats {
    pub subcategory_id: SubcategoryId,
    pub title: String,
    pub total: usize,
    pub correct: usize,
    pub percent: u32,
    pub wrong_question_ids: Vec<QuestionId>,
}

/// Reduction of a finalized attempt into reviewable statistics.
///
/// Subcategory stats are sorted ascending by percent so the weakest area
/// comes first; ties keep encounter order (first-seen subcategory wins the
/// earlier slot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptAnalysis {
    total: usize,
    correct: usize,
    percent: u32,
    duration: Duration,
    sub_stats: Vec<SubcategoryStats>,
    wrong_question_ids: Vec<QuestionId>,
}

/// `round(100 * correct / total)`, defined as 0 for an empty group.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

impl AttemptAnalysis {
    /// Reduces a finalized attempt, resolving subcategory titles through the
    /// originating set.
    #[must_use]
    pub fn analyze(attempt: &AttemptSummary, set: &QuestionSet) -> Self {
        let answers = attempt.answers();
        let total = answers.len();
        let correct = answers.iter().filter(|a| a.is_correct).count();

        // Group by subcategory in encounter order.
        let mut order: Vec<SubcategoryId> = Vec::new();
        let mut groups: HashMap<SubcategoryId, (usize, usize, Vec<QuestionId>)> = HashMap::new();
        let mut wrong_question_ids = Vec::new();

        for answer in answers {
            let entry = groups
                .entry(answer.subcategory_id.clone())
                .or_insert_with(|| {
                    order.push(answer.subcategory_id.clone());
                    (0, 0, Vec::new())
                });
            entry.0 += 1;
            if answer.is_correct {
                entry.1 += 1;
            } else {
                entry.2.push(answer.question_id.clone());
                wrong_question_ids.push(answer.question_id.clone());
            }
        }

        let mut sub_stats: Vec<SubcategoryStats> = order
            .into_iter()
            .map(|subcategory_id| {
                let (sub_total, sub_correct, wrong) = groups
                    .remove(&subcategory_id)
                    .unwrap_or((0, 0, Vec::new()));
                SubcategoryStats {
                    title: set.subcategory_title(&subcategory_id),
                    subcategory_id,
                    total: sub_total,
                    correct: sub_correct,
                    percent: percent(sub_correct, sub_total),
                    wrong_question_ids: wrong,
                }
            })
            .collect();

        // Stable sort keeps encounter order among equal percents.
        sub_stats.sort_by_key(|stats| stats.percent);

        Self {
            total,
            correct,
            percent: percent(correct, total),
            duration: attempt.duration(),
            sub_stats,
            wrong_question_ids,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn percent(&self) -> u32 {
        self.percent
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Subcategory stats, weakest first.
    #[must_use]
    pub fn sub_stats(&self) -> &[SubcategoryStats] {
        &self.sub_stats
    }

    /// The weakest subcategory, when any subcategories exist.
    #[must_use]
    pub fn weakest(&self) -> Option<&SubcategoryStats> {
        self.sub_stats.first()
    }

    /// All incorrectly answered question ids, in session order.
    #[must_use]
    pub fn wrong_question_ids(&self) -> &[QuestionId] {
        &self.wrong_question_ids
    }

    /// Wrong-id filter set for a follow-up session.
    #[must_use]
    pub fn wrong_id_set(&self) -> HashSet<QuestionId> {
        self.wrong_question_ids.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcq_core::model::{
        AnswerOption, AttemptAnswer, AttemptId, CategoryId, Mode, OptionKey, Question,
        SessionConfig, SetId, Subcategory,
    };
    use mcq_core::time::fixed_now;

    fn build_set() -> QuestionSet {
        let question = |id: &str| {
            Question::new(
                QuestionId::new(id),
                format!("Stem {id}"),
                vec![
                    AnswerOption::new("A", "first"),
                    AnswerOption::new("B", "second"),
                ],
                OptionKey::new("A"),
                None,
                None,
            )
            .unwrap()
        };
        QuestionSet::new(
            SetId::new("set1"),
            "Set One",
            vec![
                Subcategory::new(
                    SubcategoryId::new("sub1"),
                    "Anatomy",
                    vec![question("q1"), question("q2"), question("q3")],
                ),
                Subcategory::new(
                    SubcategoryId::new("sub2"),
                    "Pharma",
                    vec![question("q4"), question("q5")],
                ),
            ],
        )
    }

    fn answer(id: &str, sub: &str, correct: bool) -> AttemptAnswer {
        AttemptAnswer::answered(
            QuestionId::new(id),
            SubcategoryId::new(sub),
            OptionKey::new(if correct { "A" } else { "B" }),
            OptionKey::new("A"),
            false,
        )
    }

    fn build_attempt(answers: Vec<AttemptAnswer>) -> AttemptSummary {
        let config = SessionConfig::new(Mode::Practice);
        AttemptSummary::new(
            AttemptId::new("att_1"),
            CategoryId::new("cat1"),
            SetId::new("set1"),
            &config,
            fixed_now(),
            fixed_now() + Duration::seconds(300),
            answers,
        )
        .unwrap()
    }

    #[test]
    fn two_subcategory_scenario_scores_and_ranks() {
        // sub1: 2/3 correct, sub2: 1/2 correct.
        let attempt = build_attempt(vec![
            answer("q1", "sub1", true),
            answer("q2", "sub1", true),
            answer("q3", "sub1", false),
            answer("q4", "sub2", true),
            answer("q5", "sub2", false),
        ]);

        let analysis = AttemptAnalysis::analyze(&attempt, &build_set());

        assert_eq!(analysis.total(), 5);
        assert_eq!(analysis.correct(), 3);
        assert_eq!(analysis.percent(), 60);
        assert_eq!(analysis.duration(), Duration::seconds(300));

        let stats = analysis.sub_stats();
        assert_eq!(stats.len(), 2);
        // Weakest first: Pharma at 50%, Anatomy at 67% (rounded from 66.6).
        assert_eq!(stats[0].subcategory_id, SubcategoryId::new("sub2"));
        assert_eq!(stats[0].percent, 50);
        assert_eq!(stats[0].title, "Pharma");
        assert_eq!(stats[1].percent, 67);

        let weakest = analysis.weakest().unwrap();
        assert_eq!(weakest.subcategory_id, SubcategoryId::new("sub2"));
        assert_eq!(
            analysis.wrong_question_ids(),
            &[QuestionId::new("q3"), QuestionId::new("q5")]
        );
    }

    #[test]
    fn empty_attempt_has_zero_percent_and_no_weakest() {
        let attempt = build_attempt(Vec::new());
        let analysis = AttemptAnalysis::analyze(&attempt, &build_set());

        assert_eq!(analysis.total(), 0);
        assert_eq!(analysis.percent(), 0);
        assert!(analysis.sub_stats().is_empty());
        assert!(analysis.weakest().is_none());
        assert!(analysis.wrong_question_ids().is_empty());
    }

    #[test]
    fn percent_ties_keep_encounter_order() {
        // Both subcategories score 0%; sub1 was seen first.
        let attempt = build_attempt(vec![
            answer("q1", "sub1", false),
            answer("q4", "sub2", false),
        ]);
        let analysis = AttemptAnalysis::analyze(&attempt, &build_set());

        let stats = analysis.sub_stats();
        assert_eq!(stats[0].subcategory_id, SubcategoryId::new("sub1"));
        assert_eq!(stats[1].subcategory_id, SubcategoryId::new("sub2"));
        assert_eq!(analysis.weakest().unwrap().subcategory_id, SubcategoryId::new("sub1"));
    }

    #[test]
    fn unknown_subcategory_falls_back_to_raw_id() {
        let attempt = build_attempt(vec![answer("q9", "ghost", false)]);
        let analysis = AttemptAnalysis::analyze(&attempt, &build_set());
        assert_eq!(analysis.sub_stats()[0].title, "ghost");
    }

    #[test]
    fn unanswered_items_count_as_wrong() {
        let unanswered = AttemptAnswer::unanswered(
            QuestionId::new("q1"),
            SubcategoryId::new("sub1"),
            OptionKey::new("A"),
            false,
        );
        let attempt = build_attempt(vec![unanswered, answer("q2", "sub1", true)]);
        let analysis = AttemptAnalysis::analyze(&attempt, &build_set());

        assert_eq!(analysis.correct(), 1);
        assert_eq!(analysis.percent(), 50);
        assert_eq!(analysis.wrong_question_ids(), &[QuestionId::new("q1")]);
        assert_eq!(analysis.wrong_id_set().len(), 1);
    }
}
