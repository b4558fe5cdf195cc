use crate::service::ServiceError;
use crate::word::{WordEntry, WordMap};

/// Message for a word search that matched nothing.
pub const NOT_FOUND_WORD: &str = "No words found in the database";

/// Message for a date query that matched nothing.
pub const NOT_FOUND_DATE: &str = "No words found for this date";

/// What a press of a lookup button should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupAction {
    /// Results were on screen and are now hidden.
    Hide,
    /// Old results are gone; send the request.
    Fetch,
    /// A request is already in flight.
    Busy,
}

/// Results, inline message and loading flag behind one lookup button.
///
/// A press while results are shown hides them. Any other press clears the
/// previous results and message before the request goes out, so a miss
/// never leaves stale results on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<T> {
    results: Option<T>,
    shown: bool,
    loading: bool,
    message: Option<String>,
    not_found: &'static str,
}

/// Search for a single word.
pub type WordLookup = Lookup<WordEntry>;

/// Words added on one date.
pub type DateLookup = Lookup<WordMap>;

impl WordLookup {
    pub fn for_word() -> Self {
        Self::new(NOT_FOUND_WORD)
    }
}

impl DateLookup {
    pub fn for_date() -> Self {
        Self::new(NOT_FOUND_DATE)
    }
}

impl<T> Lookup<T> {
    pub fn new(not_found: &'static str) -> Self {
        Self {
            results: None,
            shown: false,
            loading: false,
            message: None,
            not_found,
        }
    }

    /// Results currently on screen.
    pub fn shown(&self) -> Option<&T> {
        self.results.as_ref().filter(|_| self.shown)
    }

    pub fn is_shown(&self) -> bool {
        self.shown().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn press(&mut self) -> LookupAction {
        if self.loading {
            return LookupAction::Busy;
        }

        if self.shown {
            self.shown = false;
            return LookupAction::Hide;
        }

        self.results = None;
        self.message = None;
        self.loading = true;
        LookupAction::Fetch
    }

    /// Abandons a pressed lookup because its input was invalid.
    pub fn reject(&mut self, reason: impl ToString) {
        self.loading = false;
        self.message = Some(reason.to_string());
    }

    /// Records the service response for the request started by [`Lookup::press`].
    ///
    /// Failures show the same message as a miss; the cause is logged.
    pub fn apply(&mut self, response: Result<Option<T>, ServiceError>) {
        self.loading = false;

        match response {
            Ok(Some(results)) => {
                self.results = Some(results);
                self.shown = true;
            }
            Ok(None) => self.message = Some(self.not_found.to_string()),
            Err(error) => {
                log::error!("lookup failed: {error}");
                self.message = Some(self.not_found.to_string());
            }
        }
    }
}
