use std::time::Duration;

use crate::service::DEFAULT_API_BASE;
use crate::session::FEEDBACK_DELAY;
use crate::store::DEFAULT_CACHE_KEY;

/// Passkey used when the build does not set `WORDLY_PASSKEY`.
pub const DEFAULT_PASSKEY: &str = "wordly";

/// Runtime settings for the client.
///
/// Every field has a default, so a partial `wordly.json` only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the word service, without a trailing slash.
    pub api_base: String,
    /// Shared passkey for the add-words forms. Not a secret.
    pub passkey: String,
    /// Storage slot holding the cached word pairs.
    pub cache_key: String,
    /// How long wrong-answer feedback stays visible.
    pub feedback_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: option_env!("WORDLY_API_BASE")
                .unwrap_or(DEFAULT_API_BASE)
                .to_string(),
            passkey: option_env!("WORDLY_PASSKEY")
                .unwrap_or(DEFAULT_PASSKEY)
                .to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            feedback_delay_ms: FEEDBACK_DELAY.as_millis() as u64,
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Parses `raw`, falling back to defaults when it is not valid.
    pub fn from_json_or_default(raw: &str) -> Self {
        Self::from_json(raw).unwrap_or_else(|error| {
            log::warn!("ignoring invalid client config: {error}");
            Self::default()
        })
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}
