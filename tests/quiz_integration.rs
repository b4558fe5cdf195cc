use std::collections::HashSet;

use rand::SeedableRng;
use wordly::{
    AnswerOutcome, MemorySlot, QuizError, QuizSession, SessionError, SessionStatus, WordEntry,
    WordPairStore, generate_options, select_questions,
};

fn scenario_pool() -> Vec<WordEntry> {
    serde_json::from_str(
        r#"[{"happy": ["joyful","glad"]}, {"sad": ["unhappy","blue"]}, {"angry": ["mad","irate"]}, {"calm":["serene"]}]"#,
    )
    .expect("scenario pool should parse")
}

#[test]
fn two_distinct_questions_from_scenario_pool() {
    let pool = scenario_pool();
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);

    let questions = select_questions(&mut rng, &pool, 2).expect("pool has four words");

    assert_eq!(questions.len(), 2);
    assert_ne!(questions[0].word, questions[1].word);
}

#[test]
fn happy_question_offers_joyful_and_other_synonyms() {
    let pool = scenario_pool();
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);
    let other_synonyms: HashSet<&str> = pool[1..]
        .iter()
        .flat_map(|entry| entry.synonyms.iter().map(String::as_str))
        .collect();

    let options = generate_options(&mut rng, &pool[0], &pool);

    assert!(options.len() <= 4);
    assert_eq!(options.iter().filter(|option| *option == "joyful").count(), 1);
    assert!(
        options
            .iter()
            .filter(|option| *option != "joyful")
            .all(|option| other_synonyms.contains(option.as_str()))
    );
}

#[test]
fn single_word_pool_cannot_start_two_question_quiz() {
    let pool = scenario_pool();
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let mut session = QuizSession::new();
    session.configure().expect("idle session can configure");

    let error = session
        .start(&mut rng, &pool[..1], 2)
        .expect_err("one word is not enough");

    assert_eq!(
        error,
        SessionError::Quiz(QuizError::InsufficientWords {
            requested: 2,
            available: 1
        })
    );
    assert_eq!(session.status(), SessionStatus::Configuring);
    assert!(session.current_question().is_none());
}

#[test]
fn full_quiz_from_cached_store() {
    let mut store = WordPairStore::open(MemorySlot::new());
    store.replace_all(scenario_pool()).expect("memory slot accepts writes");
    let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
    let mut session = QuizSession::new();

    session.configure().expect("configure");
    session
        .start(&mut rng, store.load(), 3)
        .expect("pool has enough words");

    let mut misses = 0;
    let report = loop {
        let question = session.current_question().cloned().expect("quiz running");
        assert!(session.options().contains(&question.correct_answer().to_string()));

        let answer = if misses == 0 {
            Some("definitely wrong".to_string())
        } else {
            Some(question.correct_answer().to_string())
        };

        match session.submit(&mut rng, answer.as_deref()).expect("submit") {
            AnswerOutcome::Correct => {}
            AnswerOutcome::Incorrect { feedback, ticket } => {
                misses += 1;
                assert_eq!(feedback.correct_answer, question.correct_answer());
                assert!(session.advance(&mut rng, ticket));
            }
            AnswerOutcome::Finished { report, .. } => break report,
        }
    };

    assert_eq!(report.attempt_count, 3);
    assert_eq!(report.correct_count + report.incorrect_count(), 3);
    assert_eq!(report.incorrect_count(), 1);
    assert_eq!(report.incorrect_records[0].user_answer, "definitely wrong");

    session.reset(&mut store).expect("reset");
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(store.is_empty());

    session.reset(&mut store).expect("second reset");
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(store.is_empty());
}
