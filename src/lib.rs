pub mod admin;
pub mod config;
pub mod demo;
pub mod input;
pub mod lookup;
pub mod quiz;
pub mod service;
pub mod session;
pub mod store;
pub mod wasm;
pub mod word;

pub use admin::{AdminError, PasskeyGate};
pub use config::ClientConfig;
pub use demo::{DEMO_ATTEMPT_COUNT, demo_word_pairs};
pub use input::InputError;
pub use lookup::{DateLookup, Lookup, LookupAction, WordLookup};
pub use quiz::{OPTION_COUNT, QuizError, generate_options, grade, select_questions};
pub use service::{AddWordsRequest, ServiceError, WordService};
pub use session::{
    AdvanceTicket, AnswerOutcome, AnswerRecord, FEEDBACK_DELAY, Feedback, QuizReport,
    QuizSession, QuizSessionState, SessionError, SessionStatus,
};
pub use store::{CacheSlot, FileSlot, MemorySlot, StoreError, WordPairStore};
pub use word::{WordEntry, WordMap, WordPairSet};
