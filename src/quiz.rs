use rand::Rng;
use rand::seq::SliceRandom;

use crate::word::WordEntry;

/// Number of options shown for a question when the pool is large enough.
pub const OPTION_COUNT: usize = 4;

/// Upper bound on wrong answers mixed into an option set.
pub const MAX_DISTRACTORS: usize = OPTION_COUNT - 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("attempt count must be a positive number")]
    InvalidAttemptCount,
    #[error("requested {requested} questions but only {available} words are available")]
    InsufficientWords { requested: usize, available: usize },
}

/// Draws `count` distinct entries from `pool` in random order.
///
/// The pool is shuffled with Fisher-Yates, so every entry is equally likely
/// to land in any position.
///
/// # Errors
/// * [`QuizError::InvalidAttemptCount`] if `count` is zero.
/// * [`QuizError::InsufficientWords`] if `count` exceeds the pool size.
pub fn select_questions<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[WordEntry],
    count: usize,
) -> Result<Vec<WordEntry>, QuizError> {
    if count == 0 {
        return Err(QuizError::InvalidAttemptCount);
    }

    if count > pool.len() {
        return Err(QuizError::InsufficientWords {
            requested: count,
            available: pool.len(),
        });
    }

    let mut selected = pool.to_vec();
    selected.shuffle(rng);
    selected.truncate(count);

    Ok(selected)
}

/// Builds the shuffled answer options for `question`.
///
/// Distractors come from other words in `pool`, visited in random order, one
/// random synonym per word. Synonyms equal to the correct answer or to an
/// already chosen distractor are never picked, so the correct answer appears
/// exactly once and no option is repeated. Small pools yield fewer than
/// [`OPTION_COUNT`] options.
pub fn generate_options<R: Rng + ?Sized>(
    rng: &mut R,
    question: &WordEntry,
    pool: &[WordEntry],
) -> Vec<String> {
    let correct = question.correct_answer();

    let mut candidates: Vec<&WordEntry> = pool
        .iter()
        .filter(|entry| entry.word != question.word)
        .collect();
    candidates.shuffle(rng);

    let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);

    for entry in candidates {
        if options.len() == MAX_DISTRACTORS {
            break;
        }

        let usable: Vec<&String> = entry
            .synonyms
            .iter()
            .filter(|synonym| synonym.as_str() != correct && !options.contains(*synonym))
            .collect();

        if let Some(distractor) = usable.choose(rng) {
            options.push((*distractor).clone());
        }
    }

    options.push(correct.to_string());
    options.shuffle(rng);

    options
}

/// Exact string comparison of a chosen option against the expected synonym.
/// Submitting without a selection is always wrong.
pub fn grade(user_answer: Option<&str>, correct_answer: &str) -> bool {
    user_answer == Some(correct_answer)
}
