use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A word together with its ordered list of synonyms.
///
/// On the wire and in the local cache an entry is a single-key JSON object,
/// `{"happy": ["joyful", "glad"]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    /// The headword shown as the quiz prompt.
    pub word: String,
    /// Synonyms in server order. The first one is the quiz answer.
    pub synonyms: Vec<String>,
}

/// Word pairs in fetch order.
pub type WordPairSet = Vec<WordEntry>;

impl WordEntry {
    pub fn new(
        word: impl Into<String>,
        synonyms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            word: word.into(),
            synonyms: synonyms.into_iter().map(Into::into).collect(),
        }
    }

    /// The synonym a quiz expects for this word.
    ///
    /// Entries without synonyms only arrive from malformed server data; they
    /// grade against the empty string.
    pub fn correct_answer(&self) -> &str {
        self.synonyms.first().map(String::as_str).unwrap_or("")
    }

    pub fn synonym_list(&self) -> String {
        self.synonyms.join(", ")
    }
}

impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.word, self.synonym_list())
    }
}

impl Serialize for WordEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.word, &self.synonyms)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for WordEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = WordEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object with exactly one word mapped to its synonyms")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WordEntry, A::Error> {
                let (word, synonyms) = map
                    .next_entry::<String, Vec<String>>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;

                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }

                Ok(WordEntry { word, synonyms })
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

/// A `word -> synonyms` object whose key order is kept as it appears in
/// the document.
///
/// The date query and add-words endpoints exchange this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordMap(pub Vec<WordEntry>);

impl WordMap {
    pub fn entries(&self) -> &[WordEntry] {
        &self.0
    }

    pub fn into_entries(self) -> Vec<WordEntry> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<WordEntry>> for WordMap {
    fn from(entries: Vec<WordEntry>) -> Self {
        Self(entries)
    }
}

impl Serialize for WordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.word, &entry.synonyms)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WordMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = WordMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping words to synonym lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WordMap, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((word, synonyms)) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(WordEntry { word, synonyms });
                }
                Ok(WordMap(entries))
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}
