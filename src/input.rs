//! Validation of raw form input before it reaches the quiz or the network.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::word::WordEntry;

/// Value format produced by an HTML `<input type="date">`.
pub const PICKER_VALUE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("please select a date first")]
    MissingDate,
    #[error("'{0}' is not a valid date")]
    InvalidDate(String),
    #[error("enter a positive number of questions")]
    InvalidAttemptCount,
    #[error("enter a word")]
    EmptyWord,
    #[error("'{word}' needs at least one synonym")]
    MissingSynonyms { word: String },
    #[error("line {line}: expected 'word: synonym, synonym'")]
    MalformedLine { line: usize },
    #[error("line {line}: '{word}' appears more than once")]
    DuplicateWord { line: usize, word: String },
    #[error("nothing to submit")]
    NoEntries,
}

/// Parses the attempt-count field. Zero, negatives and non-numbers are rejected.
pub fn parse_attempt_count(raw: &str) -> Result<usize, InputError> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(InputError::InvalidAttemptCount),
    }
}

/// Reads the date picker value; an empty field is "no date selected".
pub fn parse_picker_date(raw: &str) -> Result<Option<NaiveDate>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, PICKER_VALUE_FORMAT)
        .map(Some)
        .map_err(|_| InputError::InvalidDate(raw.to_string()))
}

pub fn require_date(date: Option<NaiveDate>) -> Result<NaiveDate, InputError> {
    date.ok_or(InputError::MissingDate)
}

pub fn require_word(raw: &str) -> Result<String, InputError> {
    let word = raw.trim();
    if word.is_empty() {
        return Err(InputError::EmptyWord);
    }
    Ok(word.to_string())
}

/// Splits a comma separated synonym list, dropping blanks.
pub fn parse_synonyms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|synonym| !synonym.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds one entry from the single-word form.
pub fn single_entry(word: &str, synonyms: &str) -> Result<WordEntry, InputError> {
    let word = require_word(word)?;
    let synonyms = parse_synonyms(synonyms);

    if synonyms.is_empty() {
        return Err(InputError::MissingSynonyms { word });
    }

    Ok(WordEntry { word, synonyms })
}

/// Parses bulk input, one `word: synonym, synonym` per line.
///
/// Blank lines are skipped. Line numbers in errors are one-based.
pub fn parse_bulk_entries(text: &str) -> Result<Vec<WordEntry>, InputError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let (word, synonyms) = line
            .split_once(':')
            .ok_or(InputError::MalformedLine { line: line_number })?;

        let entry = single_entry(word, synonyms).map_err(|error| match error {
            InputError::EmptyWord => InputError::MalformedLine { line: line_number },
            other => other,
        })?;

        if !seen.insert(entry.word.clone()) {
            return Err(InputError::DuplicateWord {
                line: line_number,
                word: entry.word,
            });
        }

        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(InputError::NoEntries);
    }

    Ok(entries)
}
