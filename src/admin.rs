use chrono::NaiveDate;

use crate::input::{InputError, require_date};
use crate::service::AddWordsRequest;
use crate::word::WordEntry;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("incorrect passkey")]
    IncorrectPasskey,
    #[error("enter the passkey before adding words")]
    Locked,
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Hides the add-words forms behind a shared passkey.
///
/// The passkey ships inside the client and is compared in cleartext. This
/// keeps casual visitors from posting words by accident; it does not
/// authenticate anyone and the word service must not rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasskeyGate {
    passkey: String,
    unlocked: bool,
}

impl PasskeyGate {
    pub fn new(passkey: impl Into<String>) -> Self {
        Self {
            passkey: passkey.into(),
            unlocked: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// A wrong attempt can be retried immediately.
    pub fn unlock(&mut self, attempt: &str) -> Result<(), AdminError> {
        if attempt != self.passkey {
            log::debug!("passkey attempt rejected");
            return Err(AdminError::IncorrectPasskey);
        }

        self.unlocked = true;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    /// Assembles an add-words request once the gate is open and a date is chosen.
    pub fn prepare_submission(
        &self,
        date: Option<NaiveDate>,
        entries: Vec<WordEntry>,
    ) -> Result<AddWordsRequest, AdminError> {
        if !self.unlocked {
            return Err(AdminError::Locked);
        }

        let date = require_date(date)?;
        if entries.is_empty() {
            return Err(InputError::NoEntries.into());
        }

        Ok(AddWordsRequest::new(date, entries))
    }
}
