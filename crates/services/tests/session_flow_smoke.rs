use std::sync::Arc;

use mcq_core::model::{
    AnswerOption, CategoryId, Mode, OptionKey, Question, QuestionBank, QuestionId, QuestionSet,
    SessionConfig, SetId, Subcategory, SubcategoryId,
};
use mcq_core::time::{fixed_clock, fixed_now};
use services::{BankService, SessionFlowService, SessionState};
use storage::repository::InMemoryRepository;

fn build_question(id: &str, correct: &str) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Stem {id}"),
        vec![
            AnswerOption::new("A", "first"),
            AnswerOption::new("B", "second"),
            AnswerOption::new("C", "third"),
        ],
        OptionKey::new(correct),
        None,
        None,
    )
    .unwrap()
}

fn two_subcategory_bank() -> QuestionBank {
    QuestionBank::new(vec![mcq_core::model::Category::new(
        CategoryId::new("cat1"),
        "Vet",
        vec![QuestionSet::new(
            SetId::new("set1"),
            "Set One",
            vec![
                Subcategory::new(
                    SubcategoryId::new("sub1"),
                    "Anatomy",
                    vec![
                        build_question("q1", "A"),
                        build_question("q2", "A"),
                        build_question("q3", "A"),
                    ],
                ),
                Subcategory::new(
                    SubcategoryId::new("sub2"),
                    "Pharma",
                    vec![build_question("q4", "A"), build_question("q5", "A")],
                ),
            ],
        )],
    )])
}

fn ten_question_bank() -> QuestionBank {
    let questions = (1..=10).map(|n| build_question(&format!("q{n}"), "A")).collect();
    QuestionBank::new(vec![mcq_core::model::Category::new(
        CategoryId::new("cat1"),
        "Vet",
        vec![QuestionSet::new(
            SetId::new("set1"),
            "Set One",
            vec![Subcategory::new(
                SubcategoryId::new("sub1"),
                "Anatomy",
                questions,
            )],
        )],
    )])
}

fn build_service(bank: QuestionBank) -> SessionFlowService {
    let repo = InMemoryRepository::new();
    SessionFlowService::new(
        fixed_clock(),
        Arc::new(BankService::new(bank)),
        Arc::new(repo.clone()),
        Arc::new(repo),
    )
}

fn unshuffled_config(mode: Mode) -> SessionConfig {
    SessionConfig::new(mode)
        .with_shuffle_questions(false)
        .with_shuffle_options(false)
}

/// Walks the session answering each question with the given keys.
fn answer_all(mut state: SessionState, keys: &[&str]) -> SessionState {
    for (i, key) in keys.iter().enumerate() {
        state = state.select(OptionKey::new(*key)).submit();
        if i + 1 < keys.len() {
            state = state.go_next();
        }
    }
    state
}

#[tokio::test]
async fn practice_run_scores_and_surfaces_weakest_area() {
    let service = build_service(two_subcategory_bank());
    let state = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("set1"),
            unshuffled_config(Mode::Practice),
            false,
        )
        .await
        .unwrap()
        .expect("set exists");

    assert_eq!(state.progress().total, 5);

    // 2/3 correct in Anatomy, 1/2 in Pharma.
    let state = answer_all(state, &["A", "A", "B", "A", "B"]);
    assert!(state.progress().all_answered());

    let summary = service.finish(&state).await.unwrap();
    assert_eq!(summary.answers().len(), 5);
    assert_eq!(summary.started_at(), fixed_now());

    let (attempt, analysis) = service.last_attempt_analysis().await.unwrap().unwrap();
    assert_eq!(attempt.attempt_id(), summary.attempt_id());
    assert_eq!(analysis.total(), 5);
    assert_eq!(analysis.correct(), 3);
    assert_eq!(analysis.percent(), 60);

    let weakest = analysis.weakest().unwrap();
    assert_eq!(weakest.subcategory_id, SubcategoryId::new("sub2"));
    assert_eq!(weakest.percent, 50);
    assert_eq!(analysis.sub_stats()[1].percent, 67);

    let history = service.attempt_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].attempt_id(), summary.attempt_id());
}

#[tokio::test]
async fn wrong_only_follow_up_builds_a_two_item_session() {
    let service = build_service(ten_question_bank());

    // Prior attempt: everything right except q3 and q7.
    let keys: Vec<&str> = (1..=10)
        .map(|n| if n == 3 || n == 7 { "B" } else { "A" })
        .collect();
    let state = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("set1"),
            unshuffled_config(Mode::Practice),
            false,
        )
        .await
        .unwrap()
        .unwrap();
    let state = answer_all(state, &keys);
    service.finish(&state).await.unwrap();

    let (_, analysis) = service.last_attempt_analysis().await.unwrap().unwrap();
    assert_eq!(
        analysis.wrong_question_ids(),
        &[QuestionId::new("q3"), QuestionId::new("q7")]
    );
    service.queue_wrong_only_follow_up(&analysis).await.unwrap();

    let follow_up = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("set1"),
            unshuffled_config(Mode::Practice),
            true,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(follow_up.progress().total, 2);
    let ids: Vec<&str> = follow_up
        .plan()
        .items()
        .iter()
        .map(|item| item.question_id().as_str())
        .collect();
    assert_eq!(ids, vec!["q3", "q7"]);
    assert!(follow_up.config().wrong_only());
}

#[tokio::test]
async fn unanswered_exam_question_finalizes_as_incorrect() {
    let bank = QuestionBank::new(vec![mcq_core::model::Category::new(
        CategoryId::new("cat1"),
        "Vet",
        vec![QuestionSet::new(
            SetId::new("solo"),
            "Solo",
            vec![Subcategory::new(
                SubcategoryId::new("sub1"),
                "Anatomy",
                vec![build_question("q1", "A")],
            )],
        )],
    )]);
    let service = build_service(bank);

    let state = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("solo"),
            unshuffled_config(Mode::Exam),
            false,
        )
        .await
        .unwrap()
        .unwrap();

    // User never selects anything and finishes immediately.
    let summary = service.finish(&state).await.unwrap();
    assert_eq!(summary.answers().len(), 1);
    assert_eq!(summary.answers()[0].selected_key, None);
    assert!(!summary.answers()[0].is_correct);
}

#[tokio::test]
async fn unknown_set_starts_as_not_found() {
    let service = build_service(two_subcategory_bank());
    let started = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("missing"),
            unshuffled_config(Mode::Practice),
            false,
        )
        .await
        .unwrap();
    assert!(started.is_none());
}

#[tokio::test]
async fn wrong_only_without_queued_ids_runs_the_full_set() {
    let service = build_service(ten_question_bank());
    let state = service
        .start_session(
            CategoryId::new("cat1"),
            SetId::new("set1"),
            unshuffled_config(Mode::Practice),
            true,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(state.progress().total, 10);
    assert!(!state.config().wrong_only());
}

#[tokio::test]
async fn results_are_absent_before_any_finish() {
    let service = build_service(two_subcategory_bank());
    assert!(service.last_attempt_analysis().await.unwrap().is_none());
    assert!(service.attempt_history().await.unwrap().is_empty());
}
