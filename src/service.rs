use chrono::NaiveDate;

use crate::word::{WordEntry, WordMap, WordPairSet};

pub const DEFAULT_API_BASE: &str = "https://wordly-backend.onrender.com";

/// Date format the word service expects, e.g. `5/3/2024`.
pub const SERVICE_DATE_FORMAT: &str = "%-d/%-m/%Y";

/// Date format shown next to the date picker, e.g. `05/03/2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("word service is unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("word service responded with status {0}")]
    Status(u16),
    #[error("unexpected response from word service: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

pub fn service_date(date: NaiveDate) -> String {
    date.format(SERVICE_DATE_FORMAT).to_string()
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DateQuery {
    pub date: String,
}

impl DateQuery {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: service_date(date),
        }
    }
}

/// Body of the add-words request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AddWordsRequest {
    pub date: String,
    pub words: WordMap,
}

impl AddWordsRequest {
    pub fn new(date: NaiveDate, entries: Vec<WordEntry>) -> Self {
        Self {
            date: service_date(date),
            words: WordMap::from(entries),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
struct DateResponse {
    #[serde(default)]
    words: Option<WordMap>,
}

pub fn decode_all(body: &str) -> Result<WordPairSet, ServiceError> {
    Ok(serde_json::from_str(body)?)
}

/// An empty object means the word is unknown.
pub fn decode_search(body: &str) -> Result<Option<WordEntry>, ServiceError> {
    let value: serde_json::Value = serde_json::from_str(body)?;

    let empty = value.is_null() || value.as_object().is_some_and(|map| map.is_empty());
    if empty {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(value)?))
}

/// A missing or empty `words` field means nothing was stored for the date.
pub fn decode_by_date(body: &str) -> Result<Option<WordMap>, ServiceError> {
    let response: DateResponse = serde_json::from_str(body)?;
    Ok(response.words.filter(|words| !words.is_empty()))
}

/// Endpoints of the remote word store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordService {
    base_url: String,
}

impl Default for WordService {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl WordService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn all_url(&self) -> String {
        format!("{}/words/all", self.base_url)
    }

    /// `encoded_word` must already be URI-component encoded.
    pub fn search_url(&self, encoded_word: &str) -> String {
        format!("{}/words/{}", self.base_url, encoded_word)
    }

    pub fn date_url(&self) -> String {
        format!("{}/words/date", self.base_url)
    }

    pub fn add_url(&self) -> String {
        format!("{}/words", self.base_url)
    }
}

#[cfg(target_arch = "wasm32")]
mod remote {
    use gloo_net::http::Request;

    use super::*;

    impl From<gloo_net::Error> for ServiceError {
        fn from(error: gloo_net::Error) -> Self {
            Self::RemoteUnavailable(error.to_string())
        }
    }

    async fn send(request: Request) -> Result<String, ServiceError> {
        let response = request.send().await?;

        if !response.ok() {
            return Err(ServiceError::Status(response.status()));
        }

        Ok(response.text().await?)
    }

    impl WordService {
        pub async fn fetch_all(&self) -> Result<WordPairSet, ServiceError> {
            let body = send(Request::get(&self.all_url()).build()?).await?;
            decode_all(&body)
        }

        pub async fn search(&self, word: &str) -> Result<Option<WordEntry>, ServiceError> {
            let encoded = String::from(js_sys::encode_uri_component(word));
            let body = send(Request::get(&self.search_url(&encoded)).build()?).await?;
            decode_search(&body)
        }

        pub async fn words_by_date(
            &self,
            date: NaiveDate,
        ) -> Result<Option<WordMap>, ServiceError> {
            let request = Request::post(&self.date_url()).json(&DateQuery::new(date))?;
            let body = send(request).await?;
            decode_by_date(&body)
        }

        pub async fn add_words(&self, request: &AddWordsRequest) -> Result<(), ServiceError> {
            send(Request::post(&self.add_url()).json(request)?).await?;
            log::info!(
                "submitted {} word pairs for {}",
                request.words.entries().len(),
                request.date
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_dates_are_not_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");

        assert_eq!(service_date(date), "5/3/2024");
        assert_eq!(display_date(date), "05/03/2024");
    }

    #[test]
    fn date_query_body_uses_service_format() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 23).expect("valid date");
        let json = serde_json::to_string(&DateQuery::new(date)).expect("query should serialize");

        assert_eq!(json, r#"{"date":"23/11/2024"}"#);
    }

    #[test]
    fn add_words_body_nests_word_map() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).expect("valid date");
        let request = AddWordsRequest::new(
            date,
            vec![
                WordEntry::new("brisk", ["quick", "lively"]),
                WordEntry::new("arid", ["dry"]),
            ],
        );

        let json = serde_json::to_string(&request).expect("request should serialize");

        assert_eq!(
            json,
            r#"{"date":"9/1/2024","words":{"brisk":["quick","lively"],"arid":["dry"]}}"#
        );
    }

    #[test]
    fn decodes_all_words() {
        let entries = decode_all(r#"[{"happy":["joyful","glad"]},{"calm":["serene"]}]"#)
            .expect("payload should decode");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], WordEntry::new("calm", ["serene"]));
    }

    #[test]
    fn malformed_all_words_is_decode_error() {
        let error = decode_all(r#"{"happy":["joyful"]}"#).expect_err("not a list");
        assert!(matches!(error, ServiceError::Decode(_)));
    }

    #[test]
    fn search_hit_and_miss() {
        let hit = decode_search(r#"{"happy":["joyful","glad"]}"#).expect("hit should decode");
        assert_eq!(hit, Some(WordEntry::new("happy", ["joyful", "glad"])));

        assert_eq!(decode_search("{}").expect("miss should decode"), None);
    }

    #[test]
    fn date_query_without_words_is_not_found() {
        assert_eq!(decode_by_date("{}").expect("decodes"), None);
        assert_eq!(decode_by_date(r#"{"words":{}}"#).expect("decodes"), None);
        assert_eq!(decode_by_date(r#"{"words":null}"#).expect("decodes"), None);
    }

    #[test]
    fn date_query_keeps_word_order() {
        let words = decode_by_date(r#"{"words":{"tidy":["neat"],"apt":["fitting"]}}"#)
            .expect("decodes")
            .expect("words present");

        assert_eq!(
            words.into_entries(),
            vec![
                WordEntry::new("tidy", ["neat"]),
                WordEntry::new("apt", ["fitting"]),
            ]
        );
    }

    #[test]
    fn urls_trim_trailing_slash() {
        let service = WordService::new("http://localhost:3000/");

        assert_eq!(service.all_url(), "http://localhost:3000/words/all");
        assert_eq!(service.search_url("happy"), "http://localhost:3000/words/happy");
        assert_eq!(service.date_url(), "http://localhost:3000/words/date");
        assert_eq!(service.add_url(), "http://localhost:3000/words");
    }
}
