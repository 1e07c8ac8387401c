// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The language code naming a word's base (untranslated) form.
pub const ENGLISH: &str = "English";

/// Maps a language code to a word's surface form in that language.
/// e.g., {"French" => "bleu", "German" => "blau"} for "blue".
pub type Translations = BTreeMap<String, String>;

/// A single lexicon entry: the base form, its part-of-speech tag and every
/// translation listed for it on its source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub word: String,
    /// Three uppercase letters, e.g. "ADJ".
    pub pos: String,
    pub translations: Translations,
}

impl Word {
    pub fn new(word: impl Into<String>, pos: impl Into<String>, translations: Translations) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
            translations,
        }
    }

    /// The surface form of this word in `language`, treating [`ENGLISH`] as
    /// the base form.
    pub fn form_in(&self, language: &str) -> Option<&str> {
        if language == ENGLISH {
            Some(&self.word)
        } else {
            self.translations.get(language).map(String::as_str)
        }
    }
}

/// Where a sentence structure comes from: a language's stored grammar rule,
/// or an explicit list of POS tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureRef {
    Named(String),
    Explicit(Vec<String>),
}

impl StructureRef {
    pub fn named(language: impl Into<String>) -> Self {
        Self::Named(language.into())
    }

    pub fn explicit<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(tags.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for StructureRef {
    fn from(language: &str) -> Self {
        Self::Named(language.to_string())
    }
}

impl From<Vec<String>> for StructureRef {
    fn from(tags: Vec<String>) -> Self {
        Self::Explicit(tags)
    }
}

impl From<&[&str]> for StructureRef {
    fn from(tags: &[&str]) -> Self {
        Self::explicit(tags.iter().copied())
    }
}
