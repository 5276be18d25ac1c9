use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{DatasetLoadError, EntryError};
use crate::preprocess::{capitalize, lookup_key};

/// One sense of a word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meaning {
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
    pub related_words: Vec<String>,
    pub examples: Vec<String>,
}

/// Full lexical record of a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    /// Display form of the headword
    pub word: String,
    /// `None` when the record carried no MEANINGS field
    pub meanings: Option<Vec<Meaning>>,
    pub antonyms: Vec<String>,
    pub synonyms: Vec<String>,
}

impl LexiconEntry {
    pub fn new(
        word: &str,
        meanings: Vec<Meaning>,
        antonyms: Vec<String>,
        synonyms: Vec<String>,
    ) -> Self {
        Self {
            word: capitalize(word),
            meanings: Some(meanings),
            antonyms,
            synonyms,
        }
    }

    pub fn meanings(&self) -> Result<&[Meaning], EntryError> {
        self.meanings
            .as_deref()
            .ok_or_else(|| EntryError::MalformedEntry {
                word: self.word.clone(),
            })
    }
}

#[derive(Debug, Clone)]
pub struct LexiconMetadata {
    pub source: String,
    pub entry_count: usize,
}

// JSON structures for the words.json layout. Fields stay untyped so one
// odd record degrades instead of failing the whole dataset.
#[derive(Debug, Default, Deserialize)]
struct RawEntry {
    #[serde(rename = "MEANINGS", default)]
    meanings: Option<Value>,
    #[serde(rename = "ANTONYMS", default)]
    antonyms: Option<Value>,
    #[serde(rename = "SYNONYMS", default)]
    synonyms: Option<Value>,
}

impl RawEntry {
    fn from_value(word: &str, value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!("Record for {word} is not an object: {e}");
            Self::default()
        })
    }

    fn into_entry(self, word: &str) -> LexiconEntry {
        let meanings = match self.meanings {
            Some(Value::Array(values)) => Some(
                values
                    .into_iter()
                    .enumerate()
                    .filter_map(|(idx, value)| {
                        let meaning = meaning_from_value(value);
                        if meaning.is_none() {
                            tracing::warn!("Skipping meaning #{idx} of {word}: not a list");
                        }
                        meaning
                    })
                    .collect(),
            ),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!("MEANINGS of {word} is not a list: {other}");
                None
            }
        };

        LexiconEntry {
            word: capitalize(word),
            meanings,
            antonyms: self.antonyms.map(list_slot).unwrap_or_default(),
            synonyms: self.synonyms.map(list_slot).unwrap_or_default(),
        }
    }
}

/// `[partOfSpeech, definition, [related words], [examples]]`
fn meaning_from_value(value: Value) -> Option<Meaning> {
    let Value::Array(slots) = value else {
        return None;
    };
    let mut slots = slots.into_iter();

    Some(Meaning {
        part_of_speech: slots.next().and_then(text_slot),
        definition: slots.next().and_then(text_slot),
        related_words: slots.next().map(list_slot).unwrap_or_default(),
        examples: slots.next().map(list_slot).unwrap_or_default(),
    })
}

fn text_slot(value: Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

fn list_slot(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(text_slot).collect(),
        other => text_slot(other).into_iter().collect(),
    }
}

/// Dataset records in file order
struct Dataset(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DatasetVisitor)
    }
}

struct DatasetVisitor;

impl<'de> Visitor<'de> for DatasetVisitor {
    type Value = Dataset;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of words to lexicon records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Dataset, A::Error> {
        let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((word, record)) = map.next_entry::<String, Value>()? {
            records.push((word, record));
        }
        Ok(Dataset(records))
    }
}

/// Static word → entry table, read-only once loaded
#[derive(Debug, Default)]
pub struct Lexicon {
    entries: Vec<(String, LexiconEntry)>,
    index: HashMap<String, usize>,
    source: String,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dataset from a JSON string
    pub fn from_json(json: &str) -> Result<Self, DatasetLoadError> {
        let Dataset(records) = serde_json::from_str(json)?;

        let mut lexicon = Self::new();
        lexicon.source = "inline".to_string();
        for (word, raw) in records {
            let entry = RawEntry::from_value(&word, raw).into_entry(&word);
            lexicon.insert(lookup_key(&word), entry);
        }

        Ok(lexicon)
    }

    pub(crate) fn set_source(&mut self, source: String) {
        self.source = source;
    }

    /// Later records with the same key replace earlier ones in place
    fn insert(&mut self, key: String, entry: LexiconEntry) {
        if key.is_empty() {
            tracing::warn!("Skipping dataset record with an empty headword");
            return;
        }

        match self.index.get(&key) {
            Some(&idx) => {
                tracing::debug!("Replacing duplicate entry {}", entry.word);
                self.entries[idx].1 = entry;
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, entry));
            }
        }
    }

    /// Exact, case-insensitive lookup
    pub fn lookup(&self, word: &str) -> Option<&LexiconEntry> {
        self.index
            .get(&lookup_key(word))
            .and_then(|&idx| self.entries.get(idx))
            .map(|(_, entry)| entry)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Display-case headwords in dataset order, for completion
    pub fn all_words(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(_, entry)| entry.word.clone())
            .collect()
    }

    /// Merge another lexicon into this one
    /// Entries from `other` with the same key override existing ones
    pub fn merge(mut self, other: Lexicon) -> Self {
        for (key, entry) in other.entries {
            self.insert(key, entry);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metadata(&self) -> LexiconMetadata {
        LexiconMetadata {
            source: self.source.clone(),
            entry_count: self.entries.len(),
        }
    }
}
