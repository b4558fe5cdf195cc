use chrono::NaiveDate;
use wordly::service::{DateQuery, decode_by_date};
use wordly::{
    DateLookup, FileSlot, LookupAction, ServiceError, WordEntry, WordPairStore, demo_word_pairs,
    service,
};

#[test]
fn fetched_payload_survives_reload() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    let path = root.path().join("wordPairs.json");

    let fetched = service::decode_all(r#"[{"happy":["joyful","glad"]},{"calm":["serene"]}]"#);
    let mut store = WordPairStore::open(FileSlot::new(&path));
    assert!(store.refresh(fetched));

    let reloaded = WordPairStore::open(FileSlot::new(&path));
    assert_eq!(
        reloaded.load(),
        [
            WordEntry::new("happy", ["joyful", "glad"]),
            WordEntry::new("calm", ["serene"]),
        ]
        .as_slice()
    );
}

#[test]
fn failed_fetch_keeps_persisted_pairs() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    let path = root.path().join("wordPairs.json");

    let mut store = WordPairStore::open(FileSlot::new(&path));
    store.replace_all(demo_word_pairs()).expect("file write");

    assert!(!store.refresh(Err(ServiceError::Status(503))));

    let reloaded = WordPairStore::open(FileSlot::new(&path));
    assert_eq!(reloaded.load(), demo_word_pairs().as_slice());
}

#[test]
fn search_miss_leaves_cache_alone() {
    let root = tempfile::tempdir().expect("temporary directory should be created");
    let path = root.path().join("wordPairs.json");
    let mut store = WordPairStore::open(FileSlot::new(&path));
    store.replace_all(demo_word_pairs()).expect("file write");

    let found = service::decode_search("{}").expect("empty object decodes");

    assert_eq!(found, None);
    assert_eq!(store.load(), demo_word_pairs().as_slice());
}

#[test]
fn empty_date_query_is_not_found() {
    let found = service::decode_by_date("{}").expect("missing words decodes");
    assert_eq!(found, None);
}

#[test]
fn date_without_words_clears_previous_results() {
    let march_fifth = NaiveDate::from_ymd_opt(2024, 3, 5).expect("valid date");
    let query = serde_json::to_string(&DateQuery::new(march_fifth)).expect("query serializes");
    assert_eq!(query, r#"{"date":"5/3/2024"}"#);

    let mut lookup = DateLookup::for_date();
    lookup.press();
    lookup.apply(decode_by_date(r#"{"words":{"brave":["bold"]}}"#));
    assert!(lookup.is_shown());

    assert_eq!(lookup.press(), LookupAction::Hide);
    assert_eq!(lookup.press(), LookupAction::Fetch);
    assert_eq!(lookup.shown(), None);

    lookup.apply(decode_by_date(r#"{"words":{}}"#));

    assert_eq!(lookup.shown(), None);
    assert_eq!(lookup.message(), Some("No words found for this date"));
}
