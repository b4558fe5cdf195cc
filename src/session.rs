use std::time::Duration;

use rand::Rng;

use crate::quiz::{QuizError, generate_options, grade, select_questions};
use crate::store::{CacheSlot, StoreError, WordPairStore};
use crate::word::WordEntry;

/// How long the correct answer stays on screen after a wrong answer.
pub const FEEDBACK_DELAY: Duration = Duration::from_secs(3);

/// Recorded answer text when the user submitted without choosing an option.
pub const NO_ANSWER: &str = "no answer selected";

/// A question that was answered incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: WordEntry,
    pub user_answer: String,
    pub correct_answer: String,
    pub all_synonyms: Vec<String>,
}

/// Final tally of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizReport {
    pub attempt_count: usize,
    pub correct_count: usize,
    pub incorrect_records: Vec<AnswerRecord>,
}

impl QuizReport {
    pub fn incorrect_count(&self) -> usize {
        self.incorrect_records.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "You answered {} out of {} correctly.",
            self.correct_count, self.attempt_count
        )
    }
}

/// Progress through the drawn questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSessionState {
    pub quiz_set: Vec<WordEntry>,
    pub current_index: usize,
    pub correct_count: usize,
    pub incorrect_records: Vec<AnswerRecord>,
}

impl QuizSessionState {
    fn current(&self) -> Option<&WordEntry> {
        self.quiz_set.get(self.current_index)
    }

    fn report(&self) -> QuizReport {
        QuizReport {
            attempt_count: self.quiz_set.len(),
            correct_count: self.correct_count,
            incorrect_records: self.incorrect_records.clone(),
        }
    }
}

/// Message shown after a wrong answer while the quiz waits to move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub word: String,
    pub correct_answer: String,
}

impl Feedback {
    pub fn message(&self) -> String {
        format!("Incorrect! The correct answer is: {}", self.correct_answer)
    }
}

/// Permission to move past a wrong answer once the feedback delay elapses.
///
/// Tickets from a session that has since been reset or restarted are
/// rejected by [`QuizSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    epoch: u64,
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Correct answer; the next question is already current.
    Correct,
    /// Wrong answer with questions remaining. Call [`QuizSession::advance`]
    /// with the ticket after [`FEEDBACK_DELAY`].
    Incorrect {
        feedback: Feedback,
        ticket: AdvanceTicket,
    },
    /// That was the last question. A wrong last answer still carries its
    /// feedback; there is nothing to advance to.
    Finished {
        correct: bool,
        feedback: Option<Feedback>,
        report: QuizReport,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Configuring,
    InProgress,
    AwaitingAdvance,
    Finished,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("cannot {action} while the quiz is {status:?}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },
    #[error("waiting for feedback to clear before the next question")]
    AwaitingAdvance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveQuiz {
    state: QuizSessionState,
    pool: Vec<WordEntry>,
    options: Vec<String>,
    pending: Option<Feedback>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Configuring,
    InProgress(ActiveQuiz),
    Finished {
        report: QuizReport,
        feedback: Option<Feedback>,
    },
}

/// Quiz state machine: `Idle -> Configuring -> InProgress -> Finished`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    phase: Phase,
    epoch: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            epoch: 0,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match &self.phase {
            Phase::Idle => SessionStatus::Idle,
            Phase::Configuring => SessionStatus::Configuring,
            Phase::InProgress(active) if active.pending.is_some() => {
                SessionStatus::AwaitingAdvance
            }
            Phase::InProgress(_) => SessionStatus::InProgress,
            Phase::Finished { .. } => SessionStatus::Finished,
        }
    }

    /// Opens the attempt-count prompt. A finished report is discarded.
    pub fn configure(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Idle | Phase::Configuring | Phase::Finished { .. } => {
                self.phase = Phase::Configuring;
                Ok(())
            }
            Phase::InProgress(_) => Err(self.invalid("configure a quiz")),
        }
    }

    /// Leaves the attempt-count prompt without starting.
    pub fn cancel_configuration(&mut self) {
        if matches!(self.phase, Phase::Configuring) {
            self.phase = Phase::Idle;
        }
    }

    /// Starts a quiz of `count` questions over a snapshot of `pool`.
    ///
    /// On error the session stays in `Configuring` and nothing is kept.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pool: &[WordEntry],
        count: usize,
    ) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Configuring) {
            return Err(self.invalid("start a quiz"));
        }

        let quiz_set = select_questions(rng, pool, count)?;
        let pool = pool.to_vec();
        let options = generate_options(rng, &quiz_set[0], &pool);

        self.epoch += 1;
        self.phase = Phase::InProgress(ActiveQuiz {
            state: QuizSessionState {
                quiz_set,
                current_index: 0,
                correct_count: 0,
                incorrect_records: Vec::new(),
            },
            pool,
            options,
            pending: None,
        });

        log::info!("quiz started with {count} questions");
        Ok(())
    }

    pub fn current_question(&self) -> Option<&WordEntry> {
        match &self.phase {
            Phase::InProgress(active) => active.state.current(),
            _ => None,
        }
    }

    pub fn options(&self) -> &[String] {
        match &self.phase {
            Phase::InProgress(active) => &active.options,
            _ => &[],
        }
    }

    /// Feedback for the latest wrong answer, including the last question of
    /// a finished quiz until [`QuizSession::dismiss_feedback`] is called.
    pub fn feedback(&self) -> Option<&Feedback> {
        match &self.phase {
            Phase::InProgress(active) => active.pending.as_ref(),
            Phase::Finished { feedback, .. } => feedback.as_ref(),
            _ => None,
        }
    }

    /// Hides the feedback left over from the last question of a finished
    /// quiz. Feedback mid-quiz is only cleared by [`QuizSession::advance`].
    pub fn dismiss_feedback(&mut self) {
        if let Phase::Finished { feedback, .. } = &mut self.phase {
            *feedback = None;
        }
    }

    pub fn state(&self) -> Option<&QuizSessionState> {
        match &self.phase {
            Phase::InProgress(active) => Some(&active.state),
            _ => None,
        }
    }

    /// One-based question number and total, while a quiz runs.
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.state()
            .map(|state| (state.current_index + 1, state.quiz_set.len()))
    }

    pub fn report(&self) -> Option<&QuizReport> {
        match &self.phase {
            Phase::Finished { report, .. } => Some(report),
            _ => None,
        }
    }

    /// Grades `answer` for the current question and moves the quiz along.
    pub fn submit<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        answer: Option<&str>,
    ) -> Result<AnswerOutcome, SessionError> {
        let epoch = self.epoch;
        let status = self.status();
        let Phase::InProgress(active) = &mut self.phase else {
            return Err(SessionError::InvalidTransition {
                action: "submit an answer",
                status,
            });
        };

        if active.pending.is_some() {
            return Err(SessionError::AwaitingAdvance);
        }

        let index = active.state.current_index;
        let Some(question) = active.state.current().cloned() else {
            return Err(SessionError::InvalidTransition {
                action: "submit an answer",
                status,
            });
        };

        let correct_answer = question.correct_answer().to_string();
        let correct = grade(answer, &correct_answer);

        if correct {
            active.state.correct_count += 1;
        } else {
            log::debug!("incorrect answer for '{}'", question.word);
            active.state.incorrect_records.push(AnswerRecord {
                all_synonyms: question.synonyms.clone(),
                user_answer: answer.unwrap_or(NO_ANSWER).to_string(),
                correct_answer: correct_answer.clone(),
                question: question.clone(),
            });
        }

        let remaining = index + 1 < active.state.quiz_set.len();
        let feedback = (!correct).then(|| Feedback {
            word: question.word.clone(),
            correct_answer,
        });

        if !remaining {
            active.state.current_index = index + 1;
            let report = active.state.report();
            log::info!(
                "quiz finished: {}/{} correct",
                report.correct_count,
                report.attempt_count
            );
            self.phase = Phase::Finished {
                report: report.clone(),
                feedback: feedback.clone(),
            };
            return Ok(AnswerOutcome::Finished {
                correct,
                feedback,
                report,
            });
        }

        let Some(feedback) = feedback else {
            active.state.current_index += 1;
            refresh_options(rng, active);
            return Ok(AnswerOutcome::Correct);
        };

        active.pending = Some(feedback.clone());

        Ok(AnswerOutcome::Incorrect {
            feedback,
            ticket: AdvanceTicket { epoch, index },
        })
    }

    /// Dismisses the feedback for a wrong answer and shows the next question.
    ///
    /// Returns `false` without touching the session when the ticket is stale.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, ticket: AdvanceTicket) -> bool {
        if ticket.epoch != self.epoch {
            log::debug!("ignoring advance from a discarded quiz");
            return false;
        }

        let Phase::InProgress(active) = &mut self.phase else {
            return false;
        };

        if active.pending.is_none() || active.state.current_index != ticket.index {
            return false;
        }

        active.pending = None;
        active.state.current_index += 1;
        refresh_options(rng, active);
        true
    }

    /// Drops all quiz state and clears the cached word pairs.
    ///
    /// Outstanding advance tickets become stale.
    pub fn reset<S: CacheSlot>(&mut self, store: &mut WordPairStore<S>) -> Result<(), StoreError> {
        self.phase = Phase::Idle;
        self.epoch += 1;
        store.clear()
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            status: self.status(),
        }
    }
}

fn refresh_options<R: Rng + ?Sized>(rng: &mut R, active: &mut ActiveQuiz) {
    active.options = match active.state.current() {
        Some(question) => generate_options(rng, question, &active.pool),
        None => Vec::new(),
    };
}
